use crate::schema::FieldSchema;

pub fn build_extraction_prompt(schema: &FieldSchema, user_text: &str) -> String {
    let fields = schema
        .fields
        .iter()
        .map(|f| format!("  \"{}\": {}", f.id, f.type_hint()))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"You are filling in a legal form: {title}.
Extract the form fields from the user's text below.

SCHEMA:
{{
{fields}
}}

RULES:
- Use ONLY information the user explicitly stated. Never guess, infer or invent.
- If a field is not mentioned, set it to null (or [] for arrays).
- Names, ages, phone numbers and email addresses must be copied exactly as written by the user.
- Ages are numbers only, e.g. "34".
- Keep dates in the user's own wording.
- Do not add keys that are not in the schema.
- Output ONLY the JSON object, no markdown, no explanations

USER TEXT:
{user_text}

JSON OUTPUT:"#,
        title = schema.title,
    )
}

pub fn build_retry_prompt(invalid_json: &str) -> String {
    format!(
        r#"Your previous reply could not be read as a JSON object:

{}

Send the same answer again as exactly one JSON object. Keep the keys you were asked for and nothing else. Do not wrap it in markdown or add any commentary."#,
        invalid_json
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus::Category;

    #[test]
    fn test_prompt_lists_every_field() {
        let schema = FieldSchema::for_category(Category::Divorce);
        let prompt = build_extraction_prompt(schema, "We married in Pune in 2015.");

        for field in schema.fields {
            assert!(prompt.contains(&format!("\"{}\":", field.id)), "{}", field.id);
        }
        assert!(prompt.contains("We married in Pune in 2015."));
        assert!(prompt.contains("Section 13B"));
    }
}
