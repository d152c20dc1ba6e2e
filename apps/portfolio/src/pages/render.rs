//! Server-side rendering of the composed portfolio page.
//!
//! One page, one anchor per section. Every piece of stored content passes
//! through `escape` before it reaches the markup.

use std::fmt::Write;

use serde_json::Value;

use crate::profile::models::{entry_field, text_field, Document, Record};

/// Anchors for each section, in page order: (id, nav label).
pub const SECTIONS: [(&str, &str); 7] = [
    ("about", "Sobre"),
    ("education", "Formação"),
    ("certifications", "Certificações"),
    ("skills", "Competências"),
    ("languages", "Idiomas"),
    ("projects", "Projetos"),
    ("social", "Social"),
];

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a URL for an attribute, replacing script URLs with `#`.
pub fn escape_url(url: &str) -> String {
    let scheme = url.trim_start().to_ascii_lowercase();
    if scheme.starts_with("javascript:") || scheme.starts_with("data:") {
        return "#".to_string();
    }
    escape(url)
}

pub fn render_page(doc: &Document) -> String {
    let full_name = text_field(&doc.presentation, "fullName");
    let title = if full_name.is_empty() {
        "Portfolio".to_string()
    } else {
        full_name.clone()
    };

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape(&title));
    html.push_str("<link rel=\"stylesheet\" href=\"/assets/style.css\">\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<nav>\n<ul>\n");
    for (id, label) in SECTIONS {
        let _ = writeln!(html, "<li><a href=\"#{id}\">{label}</a></li>");
    }
    html.push_str("</ul>\n</nav>\n<main>\n");

    render_about(&mut html, &doc.presentation);
    render_education(&mut html, &doc.education);
    render_certifications(&mut html, &doc.certifications);
    render_skills(&mut html, &doc.technical_skills, &doc.soft_skills);
    render_text_section(&mut html, "languages", "Idiomas", &doc.languages);
    render_projects(&mut html, doc);
    render_social(&mut html, &doc.social_links);

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_about(html: &mut String, presentation: &Record) {
    html.push_str("<section id=\"about\">\n");
    let pic = text_field(presentation, "profilePic");
    if !pic.is_empty() {
        let _ = writeln!(
            html,
            "<img class=\"profile-pic\" src=\"{}\" alt=\"{}\">",
            escape_url(&pic),
            escape(&text_field(presentation, "fullName"))
        );
    }
    let _ = writeln!(
        html,
        "<h1>{}</h1>",
        escape(&text_field(presentation, "fullName"))
    );
    let bio = text_field(presentation, "bio");
    if !bio.is_empty() {
        let _ = writeln!(html, "<p class=\"bio\">{}</p>", escape(&bio));
    }
    let email = text_field(presentation, "contactEmail");
    if !email.is_empty() {
        let _ = writeln!(
            html,
            "<p class=\"contact\"><a href=\"mailto:{0}\">{0}</a></p>",
            escape(&email)
        );
    }
    html.push_str("</section>\n");
}

fn render_education(html: &mut String, education: &[Value]) {
    html.push_str("<section id=\"education\">\n<h2>Formação</h2>\n");
    if education.is_empty() {
        html.push_str("<p class=\"empty\">Nenhuma formação cadastrada.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for item in education {
            let _ = write!(
                html,
                "<li><strong>{}</strong> {}",
                escape(&entry_field(item, "course")),
                escape(&entry_field(item, "institution"))
            );
            let period = entry_field(item, "period");
            if !period.is_empty() {
                let _ = write!(html, " <span class=\"period\">({})</span>", escape(&period));
            }
            html.push_str("</li>\n");
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");
}

fn render_certifications(html: &mut String, certifications: &[Value]) {
    html.push_str("<section id=\"certifications\">\n<h2>Certificações</h2>\n");
    if certifications.is_empty() {
        html.push_str("<p class=\"empty\">Nenhuma certificação cadastrada.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for item in certifications {
            let _ = writeln!(html, "<li>{}</li>", escape(&entry_field(item, "name")));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");
}

fn render_skills(html: &mut String, technical: &[String], soft: &[String]) {
    html.push_str("<section id=\"skills\">\n<h2>Competências</h2>\n");
    for (heading, items) in [("Técnicas", technical), ("Comportamentais", soft)] {
        let _ = writeln!(html, "<h3>{heading}</h3>");
        render_text_list(html, items);
    }
    html.push_str("</section>\n");
}

fn render_text_section(html: &mut String, id: &str, heading: &str, items: &[String]) {
    let _ = writeln!(html, "<section id=\"{id}\">\n<h2>{heading}</h2>");
    render_text_list(html, items);
    html.push_str("</section>\n");
}

fn render_text_list(html: &mut String, items: &[String]) {
    if items.is_empty() {
        html.push_str("<p class=\"empty\">—</p>\n");
        return;
    }
    html.push_str("<ul class=\"tags\">\n");
    for item in items {
        let _ = writeln!(html, "<li>{}</li>", escape(item));
    }
    html.push_str("</ul>\n");
}

fn render_projects(html: &mut String, doc: &Document) {
    html.push_str("<section id=\"projects\">\n<h2>Projetos</h2>\n");
    if doc.projects.is_empty() {
        html.push_str("<p class=\"empty\">Nenhum projeto cadastrado.</p>\n");
    }
    for project in &doc.projects {
        let _ = writeln!(html, "<article class=\"project\" id=\"project-{}\">", project.id);
        let image = project.field("imageUrl");
        if !image.is_empty() {
            let _ = writeln!(
                html,
                "<img src=\"{}\" alt=\"{}\">",
                escape_url(&image),
                escape(&project.field("title"))
            );
        }
        let _ = writeln!(html, "<h3>{}</h3>", escape(&project.field("title")));
        let _ = writeln!(html, "<p>{}</p>", escape(&project.field("description")));
        let link = project.field("link");
        if !link.is_empty() {
            let _ = writeln!(
                html,
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">Ver projeto</a>",
                escape_url(&link)
            );
        }
        html.push_str("</article>\n");
    }
    html.push_str("</section>\n");
}

fn render_social(html: &mut String, links: &[Value]) {
    html.push_str("<section id=\"social\">\n<h2>Social</h2>\n<ul class=\"social\">\n");
    for link in links {
        let icon = entry_field(link, "iconClass");
        let icon = if icon.is_empty() {
            String::new()
        } else {
            format!("<i class=\"{}\"></i> ", escape(&icon))
        };
        let _ = writeln!(
            html,
            "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{icon}{}</a></li>",
            escape_url(&entry_field(link, "href")),
            escape(&entry_field(link, "name"))
        );
    }
    html.push_str("</ul>\n</section>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::models::{as_record, Project};
    use serde_json::json;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b onclick="x">&'"#),
            "&lt;b onclick=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_escape_url_blocks_script_schemes() {
        assert_eq!(escape_url("javascript:alert(1)"), "#");
        assert_eq!(escape_url("  JavaScript:alert(1)"), "#");
        assert_eq!(escape_url("https://a.dev/?q=1&r=2"), "https://a.dev/?q=1&amp;r=2");
    }

    #[test]
    fn test_seed_page_has_every_section() {
        let html = render_page(&Document::seed());
        for (id, _) in SECTIONS {
            assert!(html.contains(&format!("id=\"{id}\"")), "missing section {id}");
        }
        assert!(html.contains("<h1>Seu Nome</h1>"));
        assert!(html.contains("mailto:seu@email.com"));
    }

    #[test]
    fn test_content_is_escaped() {
        let mut doc = Document::seed();
        doc.technical_skills = vec!["<script>alert(1)</script>".into()];
        doc.projects.push(Project::new(
            1,
            as_record(json!({"title": "A & B", "link": "javascript:void(0)"})),
        ));

        let html = render_page(&doc);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<h3>A &amp; B</h3>"));
        assert!(html.contains("href=\"#\""));
    }

    #[test]
    fn test_education_and_social_render() {
        let mut doc = Document::seed();
        doc.education.push(
            json!({"course": "Ciência da Computação", "institution": "USP", "period": "2018-2022"}),
        );
        doc.education.push(json!("legacy plain entry"));
        doc.social_links.push(
            json!({"name": "GitHub", "href": "https://github.com/x", "iconClass": "fab fa-github"}),
        );

        let html = render_page(&doc);
        assert!(html.contains("<strong>Ciência da Computação</strong> USP"));
        assert!(html.contains("(2018-2022)"));
        assert!(html.contains("<i class=\"fab fa-github\"></i> GitHub"));
    }

    #[test]
    fn test_fallback_document_renders() {
        let html = render_page(&Document::fallback());
        assert!(html.contains("<title>Portfolio</title>"));
    }
}
