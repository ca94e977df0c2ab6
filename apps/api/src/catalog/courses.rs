use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Most courses returned with an analysis.
pub const MAX_RECOMMENDED_COURSES: usize = 6;

type CourseTable = &'static [(&'static str, &'static [(&'static str, &'static str)])];

/// role → [(title, url)]
const ROLE_COURSES: CourseTable = &[
    (
        "Backend Engineer",
        &[
            ("Python Tutorial", "https://docs.python.org/3/tutorial/"),
            ("PostgreSQL Tutorial", "https://www.postgresqltutorial.com/"),
            ("REST API Tutorial", "https://restfulapi.net/"),
            ("Docker: Get Started", "https://docs.docker.com/get-started/"),
            ("SQLBolt: Interactive SQL Lessons", "https://sqlbolt.com/"),
            ("FastAPI Tutorial", "https://fastapi.tiangolo.com/tutorial/"),
            ("The Twelve-Factor App", "https://12factor.net/"),
        ],
    ),
    (
        "Frontend Engineer",
        &[
            ("MDN: Learn Web Development", "https://developer.mozilla.org/en-US/docs/Learn"),
            ("React: Quick Start", "https://react.dev/learn"),
            ("TypeScript Handbook", "https://www.typescriptlang.org/docs/handbook/intro.html"),
            ("JavaScript.info", "https://javascript.info/"),
            ("web.dev: Learn CSS", "https://web.dev/learn/css"),
        ],
    ),
    (
        "Data Scientist",
        &[
            ("Kaggle Learn", "https://www.kaggle.com/learn"),
            ("pandas: Getting Started", "https://pandas.pydata.org/docs/getting_started/index.html"),
            ("NumPy: Learn", "https://numpy.org/learn/"),
            ("scikit-learn Tutorial", "https://scikit-learn.org/stable/tutorial/index.html"),
            ("Google Machine Learning Crash Course", "https://developers.google.com/machine-learning/crash-course"),
        ],
    ),
    (
        "Machine Learning Engineer",
        &[
            ("PyTorch Tutorials", "https://pytorch.org/tutorials/"),
            ("TensorFlow Tutorials", "https://www.tensorflow.org/tutorials"),
            ("MLOps Principles", "https://ml-ops.org/"),
            ("Docker: Get Started", "https://docs.docker.com/get-started/"),
            ("Made With ML", "https://madewithml.com/"),
        ],
    ),
];

/// category → [(title, url)], used when a role has no courses of its own.
const CATEGORY_COURSES: CourseTable = &[
    (
        "Software Engineering",
        &[
            ("MIT: The Missing Semester", "https://missing.csail.mit.edu/"),
            ("Pro Git", "https://git-scm.com/book/en/v2"),
            ("MDN: Learn Web Development", "https://developer.mozilla.org/en-US/docs/Learn"),
        ],
    ),
    (
        "Data Science",
        &[
            ("Kaggle Learn", "https://www.kaggle.com/learn"),
            ("Google Machine Learning Crash Course", "https://developers.google.com/machine-learning/crash-course"),
        ],
    ),
];

static BUILTIN: Lazy<CourseCatalog> =
    Lazy::new(|| CourseCatalog::from_tables(ROLE_COURSES, CATEGORY_COURSES));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    by_role: Vec<(String, Vec<Course>)>,
    by_category: Vec<(String, Vec<Course>)>,
}

impl CourseCatalog {
    pub fn builtin() -> &'static CourseCatalog {
        &BUILTIN
    }

    pub fn from_tables(roles: CourseTable, categories: CourseTable) -> Self {
        Self {
            by_role: to_courses(roles),
            by_category: to_courses(categories),
        }
    }

    /// Ordered courses for a role, falling back to its category's list.
    pub fn courses_for(&self, category: Option<&str>, role: &str) -> &[Course] {
        lookup(&self.by_role, role)
            .or_else(|| category.and_then(|c| lookup(&self.by_category, c)))
            .unwrap_or(&[])
    }

    /// At most `MAX_RECOMMENDED_COURSES` of `courses_for`.
    pub fn recommend(&self, category: Option<&str>, role: &str) -> Vec<Course> {
        self.courses_for(category, role)
            .iter()
            .take(MAX_RECOMMENDED_COURSES)
            .cloned()
            .collect()
    }
}

fn to_courses(table: CourseTable) -> Vec<(String, Vec<Course>)> {
    table
        .iter()
        .map(|(key, courses)| {
            let courses = courses
                .iter()
                .map(|(title, url)| Course {
                    title: title.to_string(),
                    url: url.to_string(),
                })
                .collect();
            (key.to_string(), courses)
        })
        .collect()
}

fn lookup<'a>(table: &'a [(String, Vec<Course>)], key: &str) -> Option<&'a [Course]> {
    table
        .iter()
        .find(|(k, courses)| k.eq_ignore_ascii_case(key.trim()) && !courses.is_empty())
        .map(|(_, courses)| courses.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_courses_capped() {
        let courses = CourseCatalog::builtin().recommend(Some("Software Engineering"), "backend engineer");
        assert_eq!(courses.len(), MAX_RECOMMENDED_COURSES);
        assert_eq!(courses[0].title, "Python Tutorial");
        assert!(courses.iter().all(|c| c.url.starts_with("https://")));
    }

    #[test]
    fn test_falls_back_to_category() {
        let catalog = CourseCatalog::from_tables(
            &[("Backend Engineer", &[])],
            &[("Software Engineering", &[("Pro Git", "https://git-scm.com/book/en/v2")])],
        );
        let courses = catalog.courses_for(Some("software engineering"), "Backend Engineer");
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].title, "Pro Git");
    }

    #[test]
    fn test_unknown_role_and_category() {
        assert!(CourseCatalog::builtin().courses_for(None, "Astronaut").is_empty());
        assert!(CourseCatalog::builtin()
            .courses_for(Some("Space"), "Astronaut")
            .is_empty());
    }
}
