//! Static skill and degree vocabularies used by resume parsing and skill
//! normalization. Job-specific skills are unioned in at parse time by the
//! caller; this file only carries the common dictionary.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Common technical skills recognized without any job context.
pub const SKILL_KEYWORDS: &[&str] = &[
    // Programming languages
    "Python", "Java", "JavaScript", "TypeScript", "C++", "C#", "Go", "Rust", "Ruby", "PHP",
    "Swift", "Kotlin", "Scala", "R", "MATLAB", "SQL", "HTML", "CSS",
    // Frameworks & libraries
    "React", "Angular", "Vue", "Node.js", "Express", "Django", "Flask", "FastAPI",
    "Spring", "Laravel", "ASP.NET", "Next.js", "Nuxt", "Svelte",
    // Databases
    "PostgreSQL", "MySQL", "MongoDB", "Redis", "Cassandra", "Elasticsearch",
    // Cloud & DevOps
    "AWS", "Azure", "GCP", "Docker", "Kubernetes", "Jenkins", "CI/CD", "Terraform",
    // Tools & process
    "Git", "Linux", "Agile", "Scrum", "JIRA", "Confluence",
];

/// Canonical spellings for skill synonyms and shorthands. Keys are lowercase.
static SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("js", "JavaScript"),
        ("javascript", "JavaScript"),
        ("ts", "TypeScript"),
        ("typescript", "TypeScript"),
        ("py", "Python"),
        ("python", "Python"),
        ("react.js", "React"),
        ("reactjs", "React"),
        ("react", "React"),
        ("node.js", "Node.js"),
        ("nodejs", "Node.js"),
        ("node", "Node.js"),
        ("postgres", "PostgreSQL"),
        ("postgresql", "PostgreSQL"),
        ("mongo", "MongoDB"),
        ("mongodb", "MongoDB"),
        ("aws", "AWS"),
        ("amazon web services", "AWS"),
        ("gcp", "Google Cloud Platform"),
        ("google cloud", "Google Cloud Platform"),
        ("k8s", "Kubernetes"),
        ("kubernetes", "Kubernetes"),
        ("docker", "Docker"),
        ("ml", "Machine Learning"),
        ("machine learning", "Machine Learning"),
        ("dl", "Deep Learning"),
        ("deep learning", "Deep Learning"),
        ("sql", "SQL"),
        ("mysql", "MySQL"),
        ("c#", "C#"),
        ("csharp", "C#"),
        ("c++", "C++"),
        ("cpp", "C++"),
        ("golang", "Go"),
        ("go", "Go"),
        ("tf", "TensorFlow"),
        ("tensorflow", "TensorFlow"),
        ("pytorch", "PyTorch"),
        ("vue.js", "Vue.js"),
        ("vuejs", "Vue.js"),
        ("vue", "Vue.js"),
        ("angularjs", "Angular"),
        ("angular", "Angular"),
        ("java", "Java"),
        ("spring", "Spring Framework"),
        ("spring boot", "Spring Boot"),
        ("springboot", "Spring Boot"),
        ("fastapi", "FastAPI"),
        ("flask", "Flask"),
        ("django", "Django"),
        ("express", "Express.js"),
        ("expressjs", "Express.js"),
        ("express.js", "Express.js"),
        ("graphql", "GraphQL"),
        ("rest", "REST API"),
        ("restful", "REST API"),
        ("rest api", "REST API"),
        ("ci/cd", "CI/CD"),
        ("cicd", "CI/CD"),
        ("git", "Git"),
        ("jenkins", "Jenkins"),
        ("terraform", "Terraform"),
        ("ansible", "Ansible"),
        ("linux", "Linux"),
        ("bash", "Bash"),
        ("shell", "Shell Scripting"),
        ("agile", "Agile"),
        ("scrum", "Scrum"),
    ])
});

/// Maps a skill to its canonical spelling; unknown skills pass through
/// trimmed but otherwise untouched.
pub fn normalize_skill(skill: &str) -> String {
    let key = skill.trim().to_lowercase();
    match SYNONYMS.get(key.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => skill.trim().to_string(),
    }
}

/// Degree/credential keywords used for education extraction. Lowercase; each
/// group covers one credential family.
pub const DEGREE_KEYWORDS: &[&str] = &[
    "bachelor", "b.s.", "bsc", "b.sc", "b.tech", "btech", "b.a.",
    "master", "m.s.", "msc", "m.sc", "m.tech", "mtech", "mba", "m.b.a",
    "phd", "ph.d", "doctorate", "doctor of philosophy",
    "associate", "diploma", "certificate", "certification",
];
