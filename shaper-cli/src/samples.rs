//! Built-in sample inputs used when no text is given.

/// Informal meeting notes for `transform`.
pub const PARAGRAPH: &str = "\
the meeting was like super long and we talked about a lot of stuff.
john said we should maybe do better with our reports and stuff coz the boss
wasn't happy. we gotta fix things by next week or there could be problems.
everyone agreed it was not great and we need to step up our game going forward.";

/// Unstructured resume for `extract`.
pub const RESUME: &str = "\
John Doe
Software Engineer
Email: johndoe@email.com | Phone: +1-555-0101
LinkedIn: linkedin.com/in/johndoe

PROFESSIONAL SUMMARY
Experienced Software Engineer with 6 years of hands-on experience building
scalable web applications, distributed systems, and AI-powered tools.

TECHNICAL SKILLS
- Languages: Python, JavaScript, TypeScript, Java, SQL, Bash
- Frameworks: React, Node.js, FastAPI, Django, Flask, LangChain
- Cloud & DevOps: AWS (EC2, S3, Lambda), Docker, Kubernetes, Terraform
- Databases: PostgreSQL, MongoDB, Redis, Elasticsearch
- Tools: Git, GitHub Actions, Jira, Postman, VS Code

PROFESSIONAL EXPERIENCE

Senior Software Engineer | TechCorp Inc. | January 2022 - Present (3 years)
- Led backend development of real-time data pipeline handling 1M+ events/day
- Architected microservices reducing system latency by 35%
- Mentored 4 junior developers and conducted code reviews

Software Engineer | StartupXYZ | June 2019 - December 2021 (2.5 years)
- Built React dashboard adopted by 10,000+ enterprise customers
- Designed and implemented 15+ RESTful APIs using FastAPI and Django
- Reduced CI/CD pipeline time from 45 to 12 minutes

Junior Developer | WebAgency LLC | July 2018 - May 2019 (10 months)
- Developed client websites using JavaScript, HTML, CSS, and PHP
- Managed MySQL databases and performed performance optimization

EDUCATION

Bachelor of Science in Computer Science
State University, New York | Graduated: May 2018 | GPA: 3.8/4.0

AWS Certified Solutions Architect - Associate | Amazon Web Services | 2021
Google Professional Data Engineer Certification | Google Cloud | 2023";

/// Product reviews for `analyze`: positive, negative, mixed.
pub const REVIEWS: [&str; 3] = [
    "\
I absolutely love this wireless headphone! The sound quality is crystal clear and the bass
is deep without being overpowering. Battery life is incredible, I got 28 hours on a single charge.
The noise cancellation works perfectly on my daily commute. Build quality feels premium.
My only gripe is that the carrying case feels cheap for the price, and the ear cushions
could be softer for extended wear. Also, the companion app crashes occasionally on Android.
Overall, highly recommend this to anyone looking for quality audio.",
    "\
Extremely disappointed with this product. The laptop overheats after just 30 minutes of use,
making it impossible to work on demanding tasks. The keyboard feels mushy and unresponsive,
and the trackpad is horribly inaccurate. Battery barely lasts 3 hours despite claiming 10.
Customer support was unhelpful when I raised these issues. The only saving grace is the
bright display, but that's not enough to justify the price. Avoid this product.",
    "\
The coffee maker does its job and makes decent coffee in about 4 minutes.
The design is sleek and fits well on my counter. However, it's quite loud during brewing
which is annoying in the morning. The carafe leaks a bit when pouring.
It's an okay product for the price range. Nothing extraordinary but gets the job done.",
];
