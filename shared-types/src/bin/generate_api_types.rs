use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for the mobile app
    let mut types = Vec::new();

    // Lead types
    types.push(clean_type(Lead::export_to_string()?));
    types.push(clean_type(LeadStatus::export_to_string()?));
    types.push(clean_type(LeadPriority::export_to_string()?));
    types.push(clean_type(CreateLeadRequest::export_to_string()?));
    types.push(clean_type(UpdateLeadRequest::export_to_string()?));
    types.push(clean_type(ListLeadsRequest::export_to_string()?));
    types.push(clean_type(LeadsResponse::export_to_string()?));
    types.push(clean_type(T9SearchRequest::export_to_string()?));

    // Note types
    types.push(clean_type(Note::export_to_string()?));
    types.push(clean_type(NoteTag::export_to_string()?));
    types.push(clean_type(CreateNoteRequest::export_to_string()?));
    types.push(clean_type(UpdateNoteRequest::export_to_string()?));
    types.push(clean_type(ListNotesRequest::export_to_string()?));
    types.push(clean_type(NotesResponse::export_to_string()?));

    // Contact types
    types.push(clean_type(Contact::export_to_string()?));
    types.push(clean_type(ContactCategory::export_to_string()?));
    types.push(clean_type(CreateContactRequest::export_to_string()?));
    types.push(clean_type(ListContactsRequest::export_to_string()?));
    types.push(clean_type(ContactsResponse::export_to_string()?));
    types.push(clean_type(FavoriteToggledResponse::export_to_string()?));

    // Call log types
    types.push(clean_type(CallLog::export_to_string()?));
    types.push(clean_type(CallDirection::export_to_string()?));
    types.push(clean_type(CallStatus::export_to_string()?));
    types.push(clean_type(CallOutcome::export_to_string()?));
    types.push(clean_type(CreateCallLogRequest::export_to_string()?));
    types.push(clean_type(ListCallLogsRequest::export_to_string()?));
    types.push(clean_type(CallSummary::export_to_string()?));
    types.push(clean_type(CallLogsResponse::export_to_string()?));
    types.push(clean_type(MatchConfidence::export_to_string()?));
    types.push(clean_type(PhoneMatchRequest::export_to_string()?));
    types.push(clean_type(PhoneMatchResponse::export_to_string()?));

    // Permission types
    types.push(clean_type(PermissionId::export_to_string()?));
    types.push(clean_type(PermissionStatus::export_to_string()?));
    types.push(clean_type(PromptRemedy::export_to_string()?));
    types.push(clean_type(PermissionPrompt::export_to_string()?));
    types.push(clean_type(GateDecision::export_to_string()?));
    types.push(clean_type(BatchOutcome::export_to_string()?));
    types.push(clean_type(PermissionPolicy::export_to_string()?));
    types.push(clean_type(SettingsResponse::export_to_string()?));

    types.push(clean_type(ErrorResponse::export_to_string()?));

    let output_dir = Path::new("../mobile/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // Everything lands in one file, so cross-type imports are dropped
    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    format!("{}\n", filtered.join("\n").trim())
}
