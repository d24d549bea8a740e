//! Sample ticket listing

use super::types::Ticket;
use axum::response::Json;

fn sample_tickets() -> Vec<Ticket> {
    [
        (1, "printer not working", "Open"),
        (2, "Cannot connect to Wifi", "In Progress"),
        (3, "Software license expired", "Closed"),
    ]
    .into_iter()
    .map(|(id, issue, status)| Ticket {
        id,
        issue: issue.to_string(),
        status: status.to_string(),
    })
    .collect()
}

/// List tickets
#[utoipa::path(
    get,
    path = "/api/tickets",
    tag = "Tickets",
    summary = "List tickets",
    description = "Fixed sample of support tickets",
    responses(
        (status = 200, description = "Tickets", body = [Ticket])
    )
)]
pub async fn get_tickets() -> Json<Vec<Ticket>> {
    Json(sample_tickets())
}
