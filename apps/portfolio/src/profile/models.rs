use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A loosely-typed record: any JSON object the client chose to store.
pub type Record = Map<String, Value>;

/// The single root document persisted by the store.
///
/// Deserialization goes through `serde_json::Value` and never fails on valid
/// JSON: each top-level key is read on its own, and a key whose shape is
/// wrong falls back to its empty default without touching the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct Document {
    pub presentation: Record,
    /// Position-addressed entries are usually objects, but anything the
    /// file holds is kept as-is.
    pub education: Vec<Value>,
    pub certifications: Vec<Value>,
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub languages: Vec<String>,
    pub projects: Vec<Project>,
    pub social_links: Vec<Value>,
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        let Value::Object(mut root) = value else {
            return Document::default();
        };
        let mut take = |key: &str| root.remove(key).unwrap_or(Value::Null);

        Document {
            presentation: match take("presentation") {
                Value::Object(map) => map,
                _ => Record::new(),
            },
            education: array_or_empty(take("education")),
            certifications: array_or_empty(take("certifications")),
            technical_skills: texts_or_empty(take("technicalSkills")),
            soft_skills: texts_or_empty(take("softSkills")),
            languages: texts_or_empty(take("languages")),
            projects: array_or_empty(take("projects"))
                .into_iter()
                .map(Project::from)
                .collect(),
            social_links: array_or_empty(take("socialLinks")),
        }
    }
}

fn array_or_empty(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

fn texts_or_empty(value: Value) -> Vec<String> {
    array_or_empty(value).iter().map(coerce_text).collect()
}

impl Document {
    /// Document written on first read when no data file exists.
    pub fn seed() -> Self {
        let mut presentation = Record::new();
        presentation.insert("fullName".into(), "Seu Nome".into());
        presentation.insert("contactEmail".into(), "seu@email.com".into());
        presentation.insert("bio".into(), "Breve biografia...".into());
        presentation.insert("profilePic".into(), "/assets/profile.png".into());

        Document {
            presentation,
            ..Document::default()
        }
    }

    /// Document served when the data file exists but cannot be read or parsed.
    pub fn fallback() -> Self {
        Document::default()
    }

    pub fn records(&self, section: Section) -> &Vec<Value> {
        match section {
            Section::Education => &self.education,
            Section::Certifications => &self.certifications,
            Section::SocialLinks => &self.social_links,
        }
    }

    pub fn records_mut(&mut self, section: Section) -> &mut Vec<Value> {
        match section {
            Section::Education => &mut self.education,
            Section::Certifications => &mut self.certifications,
            Section::SocialLinks => &mut self.social_links,
        }
    }

    pub fn texts(&self, list: TextList) -> &Vec<String> {
        match list {
            TextList::TechnicalSkills => &self.technical_skills,
            TextList::SoftSkills => &self.soft_skills,
            TextList::Languages => &self.languages,
        }
    }

    pub fn texts_mut(&mut self, list: TextList) -> &mut Vec<String> {
        match list {
            TextList::TechnicalSkills => &mut self.technical_skills,
            TextList::SoftSkills => &mut self.soft_skills,
            TextList::Languages => &mut self.languages,
        }
    }

    /// Next project id: one past the current maximum, or 1 when empty.
    /// `None` once the maximum stored id is `i64::MAX`.
    pub fn next_project_id(&self) -> Option<i64> {
        match self.projects.iter().map(|p| p.id).max() {
            Some(max) => max.max(0).checked_add(1),
            None => Some(1),
        }
    }
}

/// A portfolio project. `id` is the only stable identity in the document;
/// everything else is carried as loose fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Project {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Record,
}

impl From<Value> for Project {
    /// A missing or non-integer `id` reads as 0; a non-object entry becomes
    /// an empty project.
    fn from(value: Value) -> Self {
        let mut fields = match value {
            Value::Object(map) => map,
            _ => Record::new(),
        };
        let id = fields.remove("id").as_ref().and_then(integer_id).unwrap_or(0);
        Project { id, fields }
    }
}

/// Integers, and floats with no fractional part that fit in an `i64`.
fn integer_id(value: &Value) -> Option<i64> {
    if let Some(id) = value.as_i64() {
        return Some(id);
    }
    let f = value.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

impl Project {
    /// Builds a project with the default shape, then overlays `fields`.
    /// An `id` inside `fields` is discarded.
    pub fn new(id: i64, fields: Record) -> Self {
        let mut base = Record::new();
        for key in ["title", "description", "imageUrl", "link"] {
            base.insert(key.into(), Value::String(String::new()));
        }
        let mut project = Project { id, fields: base };
        project.merge(fields);
        project
    }

    /// Shallow-merges `partial` over the project, keeping the current id.
    pub fn merge(&mut self, partial: Record) {
        for (key, value) in partial {
            if key != "id" {
                self.fields.insert(key, value);
            }
        }
    }

    pub fn field(&self, key: &str) -> String {
        text_field(&self.fields, key)
    }
}

/// Position-addressed record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Education,
    Certifications,
    SocialLinks,
}

impl Section {
    /// Default shape new records are merged over.
    pub fn default_record(self) -> Record {
        let keys: &[&str] = match self {
            Section::Education => &["course", "institution", "period"],
            Section::Certifications => &["name"],
            Section::SocialLinks => &["name", "href", "iconClass"],
        };
        keys.iter()
            .map(|k| (k.to_string(), Value::String(String::new())))
            .collect()
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Education => "education",
            Section::Certifications => "certifications",
            Section::SocialLinks => "socialLinks",
        }
    }

    pub fn not_found_message(self) -> &'static str {
        match self {
            Section::Education => "Education record not found",
            Section::Certifications => "Certification not found",
            Section::SocialLinks => "Social link not found",
        }
    }
}

/// Collections of plain strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextList {
    TechnicalSkills,
    SoftSkills,
    Languages,
}

impl TextList {
    pub fn label(self) -> &'static str {
        match self {
            TextList::TechnicalSkills => "technicalSkills",
            TextList::SoftSkills => "softSkills",
            TextList::Languages => "languages",
        }
    }

    /// Body key read by the append endpoint.
    pub fn item_key(self) -> &'static str {
        match self {
            TextList::TechnicalSkills | TextList::SoftSkills => "skill",
            TextList::Languages => "language",
        }
    }
}

/// Shallow merge: every key of `partial` overwrites the same key in `base`.
pub fn merge_record(base: &mut Record, partial: Record) {
    for (key, value) in partial {
        base.insert(key, value);
    }
}

/// Interprets an arbitrary JSON value as a record; non-objects become empty.
pub fn as_record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

/// Renders a JSON value as text the way the API stores list items.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Truthiness check used for required fields: absent, null, false, 0 and ""
/// all count as missing.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Reads a record field as display text; missing fields are empty.
pub fn text_field(record: &Record, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(value) => coerce_text(value),
    }
}

/// `text_field` for a position-addressed entry; non-object entries have no
/// fields.
pub fn entry_field(entry: &Value, key: &str) -> String {
    entry.as_object().map(|record| text_field(record, key)).unwrap_or_default()
}
