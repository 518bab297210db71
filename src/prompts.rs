//! System prompts for LLM-based personal-information extraction.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the prompt field lists must stay in sync
//!    with the record types in [`crate::schema`]; keeping both prompts in one
//!    file makes the pairing obvious when either changes.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without
//!    calling a real model, so a renamed field is caught before deployment.

/// System prompt for extracting [`crate::schema::PersonalInfo`] from free text.
pub const PERSONAL_INFO_SYSTEM_PROMPT: &str = r#"You are an expert at parsing personal information from unstructured text.
Extract personal information and structure it into the following specific fields:

Required fields to extract (use null if not found):
- name: Full name of the person
- street: Street address including number and street name
- city: City name
- state: State or province
- country: Country name
- zip_code: ZIP or postal code
- phone_number: Phone number in any format
- email: Email address if present
- confidence: Your confidence level (0.0 to 1.0) in the parsing accuracy

Respond with ONLY a valid JSON object using these exact field names.

Example input: "my name is Lewis Hamilton, I live in 2944 Monaco dr, Manchester, Colorado, USA, 92223. My phone number is 893-366-8888"
Example output: {"name": "Lewis Hamilton", "street": "2944 Monaco dr", "city": "Manchester", "state": "Colorado", "country": "USA", "zip_code": "92223", "phone_number": "893-366-8888", "email": null, "confidence": 0.95}"#;

/// Instruction sent alongside the ID-document image for
/// [`crate::schema::IdCardInfo`] extraction.
pub const ID_CARD_SYSTEM_PROMPT: &str = r#"You are an expert at extracting information from ID cards, driver's licenses, passports, and other identification documents.

Analyze the image and extract ALL visible information into the following structured format. Use null for any fields not found or not visible:

Required fields to extract:
- full_name: Complete name as shown on the document
- first_name: First/given name only
- last_name: Last/family name only
- date_of_birth: Date of birth in any format found
- id_number: Any identification number (license number, ID number, etc.)
- license_number: Specific license number if it's a driver's license
- address: Complete address as shown
- city: City name
- state: State or province
- zip_code: ZIP or postal code
- country: Country if visible
- issue_date: Date the document was issued
- expiration_date: Date the document expires
- gender: Gender designation (M/F/etc.)
- height: Height if shown
- weight: Weight if shown
- eye_color: Eye color if shown
- document_type: Type of document (Driver's License, Passport, National ID, etc.)
- issuing_authority: Organization that issued the document
- confidence: Your confidence level (0.0 to 1.0) in the extraction accuracy

Respond with ONLY a valid JSON object using these exact field names. Be thorough and extract every piece of visible text information."#;

/// Frame the user text for the text-extraction request.
pub fn parse_text_message(input: &str) -> String {
    format!("Parse this text: {input}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personal_prompt_names_every_schema_field() {
        for field in [
            "name", "street", "city", "state", "country", "zip_code", "phone_number", "email",
            "confidence",
        ] {
            assert!(
                PERSONAL_INFO_SYSTEM_PROMPT.contains(&format!("- {field}:")),
                "prompt is missing field '{field}'"
            );
        }
    }

    #[test]
    fn id_card_prompt_names_every_schema_field() {
        for field in [
            "full_name", "first_name", "last_name", "date_of_birth", "id_number",
            "license_number", "address", "city", "state", "zip_code", "country", "issue_date",
            "expiration_date", "gender", "height", "weight", "eye_color", "document_type",
            "issuing_authority", "confidence",
        ] {
            assert!(
                ID_CARD_SYSTEM_PROMPT.contains(&format!("- {field}:")),
                "prompt is missing field '{field}'"
            );
        }
    }

    #[test]
    fn parse_text_message_embeds_input() {
        assert_eq!(parse_text_message("hello"), "Parse this text: hello");
    }
}
