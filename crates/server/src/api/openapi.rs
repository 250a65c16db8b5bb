use claimdesk_core::{
    ClaimStatus, ClaimType, FilePurpose, FileStatus, JobKind, JobStatus, ScanVerdict,
};

use crate::error::Problem;

use super::schemas::{
    AckResponse, ClaimListResponse, ClaimResponse, ClaimStatusResponse, CreateClaimRequest,
    CreateFileRequest, CreateFileResponse, FileResponse, HealthResponse, InsurerListResponse,
    InsurerResponse, JobResponse, PdfResponse, PolicyValidationRequest, PolicyValidationResult,
    RegisterWebhookRequest, StartDraftRequest, UpdateClaimRequest, UserResponse,
};

#[derive(utoipa::OpenApi)]
#[openapi(
    info(
        title = "Claimdesk API",
        version = "0.1.0",
        description = "HTTP API for the claimdesk insurance-claims backend: claims, file attachments, AI draft generation, and job tracking.",
        license(name = "Apache-2.0")
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Users", description = "Authenticated caller profile"),
        (name = "Files", description = "Two-phase file upload and scanning"),
        (name = "Providers", description = "Insurer directory and policy validation"),
        (name = "Claims", description = "Claim lifecycle, drafting, PDF, and email"),
        (name = "Jobs", description = "Asynchronous job tracking"),
        (name = "Webhooks", description = "Outgoing registrations and incoming callbacks")
    ),
    paths(
        super::health::health,
        super::users::me,
        super::files::create_file_slot,
        super::files::complete_upload,
        super::files::get_file,
        super::providers::search_providers,
        super::providers::validate_policy,
        super::claims::create_claim,
        super::claims::list_claims,
        super::claims::get_claim,
        super::claims::update_claim,
        super::claims::start_draft,
        super::claims::finalize_claim,
        super::claims::generate_pdf,
        super::claims::get_pdf,
        super::claims::send_email,
        super::claims::submit_claim,
        super::claims::claim_status,
        super::jobs::get_job,
        super::stream::stream_job,
        super::webhooks::register_webhook,
        super::webhooks::incoming_insurer,
    ),
    components(schemas(
        Problem,
        HealthResponse,
        UserResponse,
        CreateFileRequest,
        CreateFileResponse,
        FileResponse,
        InsurerResponse,
        InsurerListResponse,
        PolicyValidationRequest,
        PolicyValidationResult,
        CreateClaimRequest,
        UpdateClaimRequest,
        StartDraftRequest,
        ClaimResponse,
        ClaimListResponse,
        ClaimStatusResponse,
        JobResponse,
        PdfResponse,
        RegisterWebhookRequest,
        AckResponse,
        ClaimType,
        ClaimStatus,
        FilePurpose,
        FileStatus,
        ScanVerdict,
        JobKind,
        JobStatus,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::*;

    #[test]
    fn document_builds_and_covers_the_surface() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("openapi document should serialize");
        assert!(json.contains("/v1/claims/{claim_id}/drafts"));
        assert!(json.contains("/v1/stream/jobs/{job_id}"));
        assert!(json.contains("Claimdesk API"));
    }
}
