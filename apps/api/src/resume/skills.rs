//! Skill extraction and normalization.
//!
//! Each category is a case-insensitive alternation of known skill tokens. Matches
//! are mapped to a canonical display name, deduplicated case-insensitively (first
//! canonical form wins) and returned sorted. Categories only drive matching; the
//! output is a flat list.

use std::collections::{HashMap, HashSet};

use regex::Regex;

const SKILL_CATEGORIES: &[(&str, &str)] = &[
    (
        "languages",
        r"Python|Go|C\+\+|Java|JavaScript|TypeScript|Ruby|Scala|Kotlin|Swift|Rust",
    ),
    (
        "ai_ml_libraries",
        r"TensorFlow|PyTorch|Pandas|NumPy|Keras|Scikit-learn|SciPy",
    ),
    (
        "ai_ml_concepts",
        r"Natural Language Processing|NLP|Computer Vision|Data Analysis|Machine Learning|Deep Learning|GenAI|Generative AI",
    ),
    (
        "web_frameworks",
        r"Flask|Streamlit|FastAPI|Django|Spring Boot|Ruby on Rails|Node\.js|Express\.js",
    ),
    (
        "data_visualization",
        r"Matplotlib|Seaborn|Plotly|Tableau|Power BI|Looker|D3\.js",
    ),
    (
        "cloud",
        r"AWS|Amazon Web Services|GCP|Google Cloud Platform|Azure|Microsoft Azure|Lambda|EC2|S3|Cloud Functions|CloudFormation|ARM Templates|Azure DevOps",
    ),
    (
        "devops",
        r"Docker|Kubernetes|Terraform|Jenkins|Git|CI/CD|GitLab|GitHub Actions|Ansible|Puppet|Chef",
    ),
    (
        "databases",
        r"SQL|PostgreSQL|Postgres|MySQL|MongoDB|Redis|DynamoDB|Cassandra|SQLite|Oracle DB|Microsoft SQL Server",
    ),
    (
        "tools",
        r"Linux|Nginx|Apache|Maven|Gradle|npm|yarn|Jupyter|ComfyUI|Airflow|Spark|Hadoop|Kafka",
    ),
    (
        "security",
        r"OWASP|Burp Suite|ZAP|JMeter|IAM|Security|OAuth|Encryption|Firewalls|SIEM|SOAR",
    ),
    (
        "other_tech",
        r"GraphQL|REST API|Microservices|Big Data|Data Engineering|ETL|Data Warehousing|Blockchain",
    ),
];

/// Lowercase token → canonical display name.
const CANONICAL_SKILLS: &[(&str, &str)] = &[
    ("python", "Python"),
    ("go", "Go"),
    ("c++", "C++"),
    ("java", "Java"),
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("tensorflow", "TensorFlow"),
    ("pytorch", "PyTorch"),
    ("pandas", "Pandas"),
    ("numpy", "NumPy"),
    ("keras", "Keras"),
    ("scikit-learn", "Scikit-learn"),
    ("scipy", "SciPy"),
    ("natural language processing", "NLP"),
    ("nlp", "NLP"),
    ("computer vision", "Computer Vision"),
    ("data analysis", "Data Analysis"),
    ("machine learning", "Machine Learning"),
    ("deep learning", "Deep Learning"),
    ("genai", "GenAI"),
    ("generative ai", "GenAI"),
    ("flask", "Flask"),
    ("streamlit", "Streamlit"),
    ("fastapi", "FastAPI"),
    ("django", "Django"),
    ("spring boot", "Spring Boot"),
    ("node.js", "Node.js"),
    ("express.js", "Express.js"),
    ("matplotlib", "Matplotlib"),
    ("seaborn", "Seaborn"),
    ("plotly", "Plotly"),
    ("tableau", "Tableau"),
    ("power bi", "Power BI"),
    ("aws", "AWS"),
    ("amazon web services", "AWS"),
    ("gcp", "GCP"),
    ("google cloud platform", "GCP"),
    ("azure", "Azure"),
    ("microsoft azure", "Azure"),
    ("lambda", "AWS Lambda"),
    ("ec2", "EC2"),
    ("s3", "S3"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("terraform", "Terraform"),
    ("jenkins", "Jenkins"),
    ("git", "Git"),
    ("ci/cd", "CI/CD"),
    ("gitlab", "GitLab"),
    ("github actions", "GitHub Actions"),
    ("sql", "SQL"),
    ("postgresql", "PostgreSQL"),
    ("postgres", "PostgreSQL"),
    ("mysql", "MySQL"),
    ("mongodb", "MongoDB"),
    ("redis", "Redis"),
    ("dynamodb", "DynamoDB"),
    ("jupyter", "Jupyter"),
    ("comfyui", "ComfyUI"),
    ("owasp", "OWASP"),
    ("security", "Security Engineering"),
    ("iam", "IAM"),
    ("graphql", "GraphQL"),
    ("rest api", "REST API"),
    ("microservices", "Microservices"),
];

/// Compiled category patterns plus the canonical-name lookup.
pub struct SkillTable {
    categories: Vec<(&'static str, Regex)>,
    canonical: HashMap<String, &'static str>,
}

impl SkillTable {
    pub fn new() -> Result<Self, regex::Error> {
        let categories = SKILL_CATEGORIES
            .iter()
            .map(|(name, alternation)| {
                Regex::new(&format!(r"(?i)\b({alternation})\b")).map(|re| (*name, re))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut canonical: HashMap<String, &'static str> = CANONICAL_SKILLS
            .iter()
            .map(|(token, display)| (token.to_string(), *display))
            .collect();
        // Canonical names map to themselves so re-normalizing is a no-op.
        for (_, display) in CANONICAL_SKILLS {
            canonical.entry(display.to_lowercase()).or_insert(*display);
        }

        Ok(Self {
            categories,
            canonical,
        })
    }

    #[cfg(test)]
    pub fn category_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.categories.iter().map(|(name, _)| *name)
    }

    /// Canonical display name for one raw token; unknown tokens are title-cased.
    pub fn normalize(&self, raw: &str) -> String {
        match self.canonical.get(&raw.to_lowercase()) {
            Some(display) => display.to_string(),
            None => title_case(raw),
        }
    }

    /// Normalizes, deduplicates case-insensitively (first wins) and sorts.
    pub fn normalize_all<'s, I>(&self, raw: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut seen = HashSet::new();
        let mut skills: Vec<String> = raw
            .into_iter()
            .map(|token| self.normalize(token))
            .filter(|skill| seen.insert(skill.to_lowercase()))
            .collect();
        skills.sort();
        skills
    }

    /// Every recognized skill in `text`, as sorted canonical names.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let matches = self.categories.iter().flat_map(|(_, re)| {
            re.captures_iter(text)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        });
        self.normalize_all(matches)
    }
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest.
fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alpha = false;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SkillTable {
        SkillTable::new().unwrap()
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ruby on rails"), "Ruby On Rails");
        assert_eq!(title_case("d3.js"), "D3.Js");
        assert_eq!(title_case("KAFKA"), "Kafka");
    }

    #[test]
    fn test_normalize_known_and_unknown() {
        let t = table();
        assert_eq!(t.normalize("postgres"), "PostgreSQL");
        assert_eq!(t.normalize("NATURAL LANGUAGE PROCESSING"), "NLP");
        assert_eq!(t.normalize("kafka"), "Kafka");
    }

    #[test]
    fn test_extract_dedupes_aliases_and_sorts() {
        let t = table();
        let text = "Built services in Python and python3? Used Postgres, PostgreSQL and AWS (Amazon Web Services). Docker, kubernetes.";
        let skills = t.extract(text);
        assert_eq!(
            skills,
            vec!["AWS", "Docker", "Kubernetes", "PostgreSQL", "Python"]
        );
    }

    #[test]
    fn test_extract_no_case_insensitive_duplicates() {
        let t = table();
        let skills = t.extract("SQL sql Sql MySQL mysql GIT git Git");
        assert_eq!(skills, vec!["Git", "MySQL", "SQL"]);
        let lowered: HashSet<String> = skills.iter().map(|s| s.to_lowercase()).collect();
        assert_eq!(lowered.len(), skills.len());
        let mut sorted = skills.clone();
        sorted.sort();
        assert_eq!(skills, sorted);
    }

    #[test]
    fn test_java_does_not_shadow_javascript() {
        let t = table();
        assert_eq!(t.extract("JavaScript"), vec!["JavaScript"]);
        assert_eq!(t.extract("Java and JavaScript"), vec!["Java", "JavaScript"]);
    }

    #[test]
    fn test_unmapped_match_is_title_cased() {
        let t = table();
        assert_eq!(t.extract("worked with KAFKA and hadoop"), vec!["Hadoop", "Kafka"]);
    }

    #[test]
    fn test_normalizing_canonical_set_is_idempotent() {
        let t = table();
        let text = "Lambda, security reviews, Ruby on Rails, D3.js, CloudFormation, NLP, GenAI, Scikit-learn";
        let once = t.extract(text);
        assert!(once.contains(&"AWS Lambda".to_string()));
        assert!(once.contains(&"Security Engineering".to_string()));
        let twice = t.normalize_all(once.iter().map(String::as_str));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_text_yields_no_skills() {
        assert!(table().extract("").is_empty());
    }

    #[test]
    fn test_all_categories_present() {
        assert_eq!(table().category_names().count(), 11);
    }
}
