//! Built-in prompts, rules and roles shipped with the server. Seeded at
//! schema init with INSERT OR IGNORE so user edits to their own entries are
//! never disturbed; the rows carry is_default = TRUE and are read-only.

use duckdb::{params, Connection, Result as DbResult};

struct SeedPrompt {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    content: &'static str,
    category: &'static str,
}

struct SeedRule {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    content: &'static str,
}

struct SeedRole {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    content: &'static str,
    category: &'static str,
    expertise: &'static [&'static str],
}

const DEFAULT_PROMPTS: &[SeedPrompt] = &[
    SeedPrompt {
        id: "ai-prompt-enhance",
        title: "AI Prompt Engineering",
        description: "Improve AI prompt effectiveness",
        content: "Enhance this AI prompt considering:\n- Clarity and specificity\n- Context inclusion\n- Desired output format\n- Edge cases handling\n- Error prevention\n- Response quality\nProvide specific prompt improvements.",
        category: "optimization",
    },
    SeedPrompt {
        id: "typescript-check",
        title: "TypeScript Review",
        description: "Review TypeScript implementation and types",
        content: "Review TypeScript code focusing on:\n- Type safety\n- Interface definitions\n- Generic usage\n- Type inference\n- Error handling\n- Best practices\nSuggest specific TypeScript improvements.",
        category: "development",
    },
    SeedPrompt {
        id: "api-route-check",
        title: "API Route Review",
        description: "Review and optimize API routes",
        content: "Review API route implementation:\n- Error handling\n- Input validation\n- Response formatting\n- Performance optimization\n- Security measures\nSuggest specific API improvements.",
        category: "development",
    },
    SeedPrompt {
        id: "auth-flow-review",
        title: "Auth Flow Review",
        description: "Review authentication implementation",
        content: "Analyze authentication flow for:\n- Security best practices\n- User experience\n- Error handling\n- Session management\n- Protected routes\n- Edge cases\nProvide specific auth flow improvements.",
        category: "analysis",
    },
];

const DEFAULT_RULES: &[SeedRule] = &[
    SeedRule {
        id: "default-rule-1",
        name: "Be Professional",
        description: "Maintain a professional and courteous tone in all responses",
        content: "Always maintain professional language and tone. Be courteous and respectful. Avoid casual language or slang.",
    },
    SeedRule {
        id: "default-rule-2",
        name: "Be Concise",
        description: "Provide clear and concise responses without unnecessary information",
        content: "Keep responses clear and to the point. Avoid redundancy and unnecessary elaboration. Focus on the most relevant information.",
    },
    SeedRule {
        id: "default-rule-3",
        name: "Technical Accuracy",
        description: "Ensure technical accuracy and provide up-to-date information",
        content: "Verify technical information before providing it. Include relevant version numbers or dates when discussing technical topics. Acknowledge when information might be outdated.",
    },
    SeedRule {
        id: "default-rule-4",
        name: "Code Examples",
        description: "Format and explain code examples clearly",
        content: "When providing code examples: Use proper formatting and syntax highlighting. Include comments explaining complex parts. Mention any prerequisites or dependencies.",
    },
];

const DEFAULT_ROLES: &[SeedRole] = &[
    SeedRole {
        id: "default-role-architect",
        name: "Software Architect",
        description: "Senior technical professional focused on high-level software design and system architecture",
        content: "As a Software Architect, I will:\n- Focus on system-level design decisions and architectural patterns\n- Consider scalability, maintainability, and performance implications\n- Provide guidance on technology stack selection and integration\n- Emphasize best practices in software design and development\n- Address technical debt and architectural improvements\n- Balance business requirements with technical constraints",
        category: "technical",
        expertise: &[
            "System Design",
            "Design Patterns",
            "Scalability",
            "Cloud Architecture",
            "Technical Leadership",
        ],
    },
    SeedRole {
        id: "default-role-fullstack",
        name: "Full Stack Developer",
        description: "Developer experienced in both frontend and backend development",
        content: "As a Full Stack Developer, I will:\n- Provide balanced insights on both frontend and backend aspects\n- Consider user experience alongside technical implementation\n- Focus on practical, implementable solutions\n- Suggest modern development practices and tools\n- Emphasize code quality and maintainability",
        category: "technical",
        expertise: &[
            "Frontend Development",
            "Backend Development",
            "Database Design",
            "API Development",
            "DevOps",
        ],
    },
    SeedRole {
        id: "default-role-ux",
        name: "UX Designer",
        description: "Professional focused on user experience and interface design",
        content: "As a UX Designer, I will:\n- Prioritize user-centered design principles\n- Focus on accessibility and usability\n- Consider user flow and interaction patterns\n- Emphasize consistency in user experience\n- Address user feedback and pain points",
        category: "creative",
        expertise: &[
            "User Research",
            "Interface Design",
            "Usability Testing",
            "Interaction Design",
            "Accessibility",
        ],
    },
    SeedRole {
        id: "default-role-pm",
        name: "Product Manager",
        description: "Professional responsible for product strategy and development",
        content: "As a Product Manager, I will:\n- Focus on business value and user needs\n- Consider market trends and competitive analysis\n- Prioritize features and development roadmap\n- Emphasize data-driven decision making\n- Address product lifecycle management",
        category: "business",
        expertise: &[
            "Product Strategy",
            "Market Analysis",
            "Feature Prioritization",
            "Stakeholder Management",
            "Data Analysis",
        ],
    },
];

pub fn seed_defaults(conn: &Connection) -> DbResult<()> {
    for p in DEFAULT_PROMPTS {
        conn.execute(
            "INSERT OR IGNORE INTO prompts (id, title, description, content, category, rule_ids, is_default)
             VALUES (?, ?, ?, ?, ?, '[]', TRUE)",
            params![p.id, p.title, p.description, p.content, p.category],
        )?;
    }

    for r in DEFAULT_RULES {
        conn.execute(
            "INSERT OR IGNORE INTO rules (id, name, description, content, is_default)
             VALUES (?, ?, ?, ?, TRUE)",
            params![r.id, r.name, r.description, r.content],
        )?;
    }

    for r in DEFAULT_ROLES {
        let expertise = serde_json::to_string(r.expertise).unwrap_or_else(|_| "[]".to_string());
        conn.execute(
            "INSERT OR IGNORE INTO roles (id, name, description, content, category, expertise, is_default)
             VALUES (?, ?, ?, ?, ?, ?, TRUE)",
            params![r.id, r.name, r.description, r.content, r.category, expertise],
        )?;
    }

    Ok(())
}
