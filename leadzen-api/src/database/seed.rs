use crate::database::{call_logs, contacts, leads, AsyncDbConnection};
use anyhow::Result;
use shared_types::{
    CallDirection, CallOutcome, CallStatus, ContactCategory, CreateCallLogRequest,
    CreateContactRequest, CreateLeadRequest, LeadPriority, LeadStatus,
};

fn demo_lead(
    name: &str,
    company: &str,
    phone: &str,
    status: LeadStatus,
    priority: LeadPriority,
    value: f64,
) -> CreateLeadRequest {
    CreateLeadRequest {
        name: name.to_string(),
        email: Some(format!(
            "{}@{}.example",
            name.split_whitespace().next().unwrap_or(name).to_lowercase(),
            company.split_whitespace().next().unwrap_or(company).to_lowercase()
        )),
        phone: phone.to_string(),
        company: Some(company.to_string()),
        position: None,
        source: Some("demo".to_string()),
        status: Some(status),
        priority: Some(priority),
        value: Some(value),
        notes: None,
        tags: vec![],
    }
}

fn demo_contact(first: &str, last: &str, phone: &str, category: ContactCategory) -> CreateContactRequest {
    CreateContactRequest {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: None,
        phone: Some(phone.to_string()),
        company: None,
        position: None,
        address: None,
        notes: None,
        tags: vec![],
        category,
    }
}

/// Inserts demo data when the database has no leads yet. Returns whether anything was inserted.
pub async fn seed_demo_data(conn: AsyncDbConnection) -> Result<bool> {
    if leads::count_leads(conn.clone()).await? > 0 {
        tracing::info!("Database already seeded, skipping");
        return Ok(false);
    }

    let demo_leads = [
        demo_lead("Ananya Sharma", "Tata Digital", "+91 98200 11111", LeadStatus::New, LeadPriority::High, 250000.0),
        demo_lead("Rohit Verma", "Infosys", "+91 98200 22222", LeadStatus::Contacted, LeadPriority::Medium, 120000.0),
        demo_lead("Priya Nair", "Zoho", "+91 98200 33333", LeadStatus::Qualified, LeadPriority::Urgent, 480000.0),
        demo_lead("Karan Mehta", "Freshworks", "+91 98200 44444", LeadStatus::Proposal, LeadPriority::High, 300000.0),
        demo_lead("Sneha Rao", "Razorpay", "+91 98200 55555", LeadStatus::ClosedWon, LeadPriority::Low, 90000.0),
    ];

    let now = chrono::Utc::now().timestamp();
    for (i, request) in demo_leads.iter().enumerate() {
        let lead = leads::insert_lead(conn.clone(), request).await?;
        let started_at = now - (i as i64 + 1) * 3600;
        let (direction, outcome, duration) = match i % 3 {
            0 => (CallDirection::Outbound, Some(CallOutcome::MeetingScheduled), 420),
            1 => (CallDirection::Inbound, Some(CallOutcome::CallbackRequested), 95),
            _ => (CallDirection::Missed, None, 0),
        };
        call_logs::insert_call_log(
            conn.clone(),
            &CreateCallLogRequest {
                lead_id: Some(lead.id),
                phone_number: request.phone.clone(),
                contact_name: Some(lead.name.clone()),
                direction,
                status: if duration > 0 { CallStatus::Ended } else { CallStatus::NoAnswer },
                started_at,
                ended_at: Some(started_at + duration),
                duration,
                notes: None,
                outcome,
            },
        )
        .await?;
        leads::touch_last_contacted(conn.clone(), lead.id, started_at).await?;
    }

    let demo_contacts = [
        demo_contact("Vikram", "Singh", "+91 99000 10101", ContactCategory::Customer),
        demo_contact("Aisha", "Khan", "+91 99000 20202", ContactCategory::Prospect),
        demo_contact("Deepak", "Joshi", "+91 99000 30303", ContactCategory::Vendor),
        demo_contact("Lakshmi", "Iyer", "+91 99000 40404", ContactCategory::Partner),
    ];
    for request in &demo_contacts {
        contacts::insert_contact(conn.clone(), request).await?;
    }

    tracing::info!(
        "Seeded {} leads, {} calls and {} contacts",
        demo_leads.len(),
        demo_leads.len(),
        demo_contacts.len()
    );
    Ok(true)
}
