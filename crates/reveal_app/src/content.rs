//! Static page content
//!
//! Everything the sections animate: navigation links, the about timeline,
//! projects and skill levels.

use reveal_motion::NavLink;

/// Text revealed by the hero typewriter
pub const HERO_ROLE: &str = "Software Developer";

/// Hero entry items, in stagger order
pub const HERO_ITEMS: [&str; 5] = [
    "hero-greeting",
    "hero-name",
    "hero-role",
    "hero-tagline",
    "hero-actions",
];

/// `(name, href)` of the header links
pub const NAV_LINKS: [(&str, &str); 5] = [
    ("Home", "#hero"),
    ("About", "#about"),
    ("Projects", "#projects"),
    ("Skills", "#skills"),
    ("Contact", "#contact"),
];

pub fn nav_links() -> Vec<NavLink> {
    NAV_LINKS
        .iter()
        .map(|(name, href)| NavLink::new(*name, *href))
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelineEntry {
    pub year: &'static str,
    pub title: &'static str,
}

pub const TIMELINE: [TimelineEntry; 4] = [
    TimelineEntry {
        year: "2022 - Present",
        title: "Senior Software Developer",
    },
    TimelineEntry {
        year: "2020 - 2022",
        title: "Software Engineer",
    },
    TimelineEntry {
        year: "2019 - 2020",
        title: "Frontend Developer",
    },
    TimelineEntry {
        year: "2018",
        title: "Computer Science Degree",
    },
];

/// Categories the project filter recognizes
pub const PROJECT_CATEGORIES: [&str; 3] = ["frontend", "fullstack", "mobile"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Project {
    pub id: u32,
    pub title: &'static str,
    pub category: &'static str,
    pub technologies: &'static [&'static str],
}

impl Project {
    pub fn element_id(&self) -> String {
        format!("project-{}", self.id)
    }
}

pub const PROJECTS: [Project; 6] = [
    Project {
        id: 1,
        title: "E-Commerce Platform",
        category: "fullstack",
        technologies: &["React", "Node.js", "Express", "MongoDB", "Stripe"],
    },
    Project {
        id: 2,
        title: "Real-Time Dashboard",
        category: "frontend",
        technologies: &["Next.js", "TypeScript", "Socket.io", "D3.js", "Tailwind CSS"],
    },
    Project {
        id: 3,
        title: "Task Management App",
        category: "mobile",
        technologies: &["React Native", "Firebase", "Redux", "Expo"],
    },
    Project {
        id: 4,
        title: "Social Media Platform",
        category: "fullstack",
        technologies: &["React", "GraphQL", "Apollo", "PostgreSQL", "AWS"],
    },
    Project {
        id: 5,
        title: "AI Content Generator",
        category: "frontend",
        technologies: &["TypeScript", "OpenAI API", "Next.js", "Tailwind CSS"],
    },
    Project {
        id: 6,
        title: "Fitness Tracking Mobile App",
        category: "mobile",
        technologies: &["React Native", "TypeScript", "Firebase", "Redux"],
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Skill {
    pub name: &'static str,
    /// Proficiency, 0..=100
    pub level: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkillCategory {
    pub name: &'static str,
    pub skills: &'static [Skill],
}

const fn skill(name: &'static str, level: u8) -> Skill {
    Skill { name, level }
}

pub const SKILL_CATEGORIES: [SkillCategory; 6] = [
    SkillCategory {
        name: "Frontend",
        skills: &[
            skill("React", 95),
            skill("TypeScript", 90),
            skill("Next.js", 88),
            skill("CSS/SCSS", 92),
            skill("Tailwind CSS", 95),
            skill("JavaScript", 98),
        ],
    },
    SkillCategory {
        name: "Backend",
        skills: &[
            skill("Node.js", 90),
            skill("Express", 88),
            skill("REST API", 95),
            skill("GraphQL", 85),
            skill("Python", 80),
        ],
    },
    SkillCategory {
        name: "Database",
        skills: &[
            skill("MongoDB", 88),
            skill("PostgreSQL", 85),
            skill("Firebase", 92),
            skill("Redis", 75),
        ],
    },
    SkillCategory {
        name: "DevOps",
        skills: &[
            skill("Git", 95),
            skill("Docker", 85),
            skill("CI/CD", 82),
            skill("AWS", 78),
        ],
    },
    SkillCategory {
        name: "Mobile",
        skills: &[
            skill("React Native", 90),
            skill("Flutter", 75),
            skill("Responsive Design", 95),
        ],
    },
    SkillCategory {
        name: "Other",
        skills: &[
            skill("UI/UX Design", 88),
            skill("Testing", 85),
            skill("Agile", 90),
            skill("Problem Solving", 95),
        ],
    },
];

/// Lowercase, dash-separated form of a display name
///
/// `"CSS/SCSS"` becomes `"css-scss"`.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("CSS/SCSS"), "css-scss");
        assert_eq!(slug("Next.js"), "next-js");
        assert_eq!(slug("UI/UX Design"), "ui-ux-design");
        assert_eq!(slug("CI/CD"), "ci-cd");
    }

    #[test]
    fn test_projects_use_recognized_categories() {
        assert!(PROJECTS
            .iter()
            .all(|project| PROJECT_CATEGORIES.contains(&project.category)));
    }
}
