use once_cell::sync::Lazy;
use serde::Serialize;

use crate::analysis::models::RoleProfile;

type RoleTable = &'static [(&'static str, &'static [(&'static str, &'static str, &'static [&'static str])])];

/// category → [(role, description, required skills)]
const BUILTIN_ROLES: RoleTable = &[
    (
        "Software Engineering",
        &[
            (
                "Backend Engineer",
                "Build scalable backend services.",
                &["python", "apis", "databases", "sql", "rest", "docker"],
            ),
            (
                "Frontend Engineer",
                "Build user interfaces and web experiences.",
                &["html", "css", "javascript", "react", "typescript"],
            ),
        ],
    ),
    (
        "Data Science",
        &[
            (
                "Data Scientist",
                "Analyze data and build ML models.",
                &["python", "pandas", "numpy", "scikit-learn", "ml"],
            ),
            (
                "Machine Learning Engineer",
                "Productionize ML models and pipelines.",
                &["python", "tensorflow", "pytorch", "mlops", "docker"],
            ),
        ],
    ),
];

static BUILTIN: Lazy<RoleCatalog> = Lazy::new(|| RoleCatalog::from_table(BUILTIN_ROLES));

#[derive(Debug, Clone, Serialize)]
pub struct RoleEntry {
    pub name: String,
    #[serde(flatten)]
    pub profile: RoleProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleCategory {
    pub name: String,
    pub roles: Vec<RoleEntry>,
}

/// Target roles grouped by category. Lookups ignore case and surrounding
/// whitespace.
#[derive(Debug, Clone, Serialize)]
pub struct RoleCatalog {
    categories: Vec<RoleCategory>,
}

impl RoleCatalog {
    pub fn builtin() -> &'static RoleCatalog {
        &BUILTIN
    }

    pub fn from_table(table: RoleTable) -> Self {
        let categories = table
            .iter()
            .map(|(category, roles)| RoleCategory {
                name: category.to_string(),
                roles: roles
                    .iter()
                    .map(|(name, description, skills)| RoleEntry {
                        name: name.to_string(),
                        profile: RoleProfile::new(*description, skills),
                    })
                    .collect(),
            })
            .collect();
        Self { categories }
    }

    pub fn category(&self, name: &str) -> Option<&RoleCategory> {
        self.categories.iter().find(|c| same_name(&c.name, name))
    }

    /// Role within a named category.
    pub fn role(&self, category: &str, role: &str) -> Option<(&RoleCategory, &RoleEntry)> {
        let category = self.category(category)?;
        let entry = category.roles.iter().find(|r| same_name(&r.name, role))?;
        Some((category, entry))
    }

    /// First role with this name in any category.
    pub fn find_role(&self, role: &str) -> Option<(&RoleCategory, &RoleEntry)> {
        self.categories.iter().find_map(|category| {
            category
                .roles
                .iter()
                .find(|r| same_name(&r.name, role))
                .map(|entry| (category, entry))
        })
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
