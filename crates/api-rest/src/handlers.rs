use crate::error::{ApiError, AppJson, AppPath, AppQuery};
use crate::AppState;
use api_shared::{
    AnswersReq, CodeLookupRes, ErrorEnvelope, ErrorKind, ErrorResponse, HealthRes, HealthService,
    HhsbRes, ListSubmissionsQuery, ListSubmissionsRes, RedFlagsRes, SaveDraftReq,
    SearchCodesQuery, SearchCodesRes, SubmissionRes, SubmitQuestionnaireReq, ValidateCodeReq,
    ValidateCodeRes,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use hysio_core::knowledge_base::find_entry;
use hysio_core::{
    code_details, detect_red_flags, map_to_hhsb, search_codes as search_knowledge_base, summarise,
    validate_code, validate_codes,
};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used by monitoring and load balancer health checks.
#[axum::debug_handler]
pub(crate) async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/validate-code",
    request_body = ValidateCodeReq,
    responses(
        (status = 200, description = "Validation result for one code or a batch", body = ValidateCodeRes),
        (status = 400, description = "Neither code nor codes given, or batch too large", body = ErrorResponse)
    )
)]
/// Validate one DCSPH code or a batch of codes
///
/// When both `code` and `codes` are present the batch is validated.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - neither `code` nor `codes` is given,
/// - `codes` is empty, or
/// - `codes` has more entries than the configured batch limit.
#[axum::debug_handler]
pub(crate) async fn validate_code_body(
    State(state): State<AppState>,
    AppJson(req): AppJson<ValidateCodeReq>,
) -> Result<Json<ValidateCodeRes>, ApiError> {
    match (req.codes, req.code) {
        (Some(codes), _) => {
            if codes.is_empty() {
                return Err(ApiError::validation("codes must contain at least one code"));
            }
            let max = state.cfg.max_batch_codes();
            if codes.len() > max {
                return Err(ApiError::validation(format!(
                    "codes may contain at most {max} entries (got {})",
                    codes.len()
                )));
            }
            Ok(Json(ValidateCodeRes::batch(validate_codes(codes.as_slice()))))
        }
        (None, Some(code)) => Ok(Json(ValidateCodeRes::single(validate_code(&code)))),
        (None, None) => Err(ApiError::validation("Provide either 'code' or 'codes'")),
    }
}

#[utoipa::path(
    get,
    path = "/validate-code/{code}",
    params(
        ("code" = String, Path, description = "Four-digit DCSPH code")
    ),
    responses(
        (status = 200, description = "Code found in the knowledge base", body = CodeLookupRes),
        (status = 400, description = "Malformed code", body = ErrorResponse),
        (status = 404, description = "Code not in the knowledge base", body = ErrorResponse)
    )
)]
/// Look up a single DCSPH code
///
/// Retired codes are found and reported with `isValid = false`. Codes that are
/// well formed but absent from the knowledge base are a 404 whose suggestions
/// name nearby codes.
#[axum::debug_handler]
pub(crate) async fn lookup_code(
    AppPath(code): AppPath<String>,
) -> Result<Json<CodeLookupRes>, ApiError> {
    let validation = validate_code(&code);

    let Some(details) = code_details(&validation.code) else {
        return Err(ApiError::validation(validation.reasons.join("; ")));
    };

    if find_entry(&validation.code).is_none() {
        let suggestions = validation
            .suggestions
            .iter()
            .filter_map(|c| find_entry(c))
            .map(|e| format!("Try {} ({})", e.code, e.description))
            .collect();
        return Err(ErrorEnvelope::not_found(format!(
            "DCSPH code {} was not found",
            validation.code
        ))
        .with_suggestions(suggestions)
        .into());
    }

    Ok(Json(CodeLookupRes {
        success: true,
        validation,
        details: Some(details),
    }))
}

#[utoipa::path(
    get,
    path = "/codes",
    params(SearchCodesQuery),
    responses(
        (status = 200, description = "Accepted codes matching the query", body = SearchCodesRes),
        (status = 400, description = "Invalid limit", body = ErrorResponse)
    )
)]
/// Search the DCSPH knowledge base
#[axum::debug_handler]
pub(crate) async fn search_codes(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchCodesQuery>,
) -> Result<Json<SearchCodesRes>, ApiError> {
    let limit = match query.limit {
        Some(0) => return Err(ApiError::validation("limit must be greater than zero")),
        Some(n) => n.min(state.cfg.max_page_limit()),
        None => state.cfg.default_page_limit(),
    };

    let codes = search_knowledge_base(query.q.as_deref().unwrap_or(""), limit)
        .into_iter()
        .copied()
        .collect();

    Ok(Json(SearchCodesRes {
        success: true,
        codes,
    }))
}

#[utoipa::path(
    post,
    path = "/red-flags",
    request_body = AnswersReq,
    responses(
        (status = 200, description = "Detected red flags", body = RedFlagsRes),
        (status = 400, description = "Malformed answers", body = ErrorResponse)
    )
)]
/// Run red-flag detection over a set of answers
#[axum::debug_handler]
pub(crate) async fn red_flags(
    AppJson(req): AppJson<AnswersReq>,
) -> Result<Json<RedFlagsRes>, ApiError> {
    let red_flags = detect_red_flags(&req.answers);
    let summary = summarise(&red_flags);

    Ok(Json(RedFlagsRes {
        success: true,
        red_flags,
        summary,
    }))
}

#[utoipa::path(
    post,
    path = "/hhsb",
    request_body = AnswersReq,
    responses(
        (status = 200, description = "HHSB document", body = HhsbRes),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse)
    )
)]
/// Map a set of answers into an HHSB document
///
/// # Errors
/// Returns `400 Bad Request` listing every missing or malformed field.
#[axum::debug_handler]
pub(crate) async fn hhsb(AppJson(req): AppJson<AnswersReq>) -> Result<Json<HhsbRes>, ApiError> {
    let red_flags = detect_red_flags(&req.answers);
    let hhsb = map_to_hhsb(&req.answers, &red_flags)?;

    Ok(Json(HhsbRes {
        success: true,
        hhsb,
    }))
}

#[utoipa::path(
    post,
    path = "/save-draft",
    request_body = SaveDraftReq,
    responses(
        (status = 200, description = "Draft saved", body = SubmissionRes),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 409, description = "Session already submitted", body = ErrorResponse)
    )
)]
/// Auto-save answers into the session's draft
#[axum::debug_handler]
pub(crate) async fn save_draft(
    State(state): State<AppState>,
    AppJson(req): AppJson<SaveDraftReq>,
) -> Result<Json<SubmissionRes>, ApiError> {
    let submission = state.submissions.save_draft(req.session_id, req.answers)?;
    Ok(Json(submission.into()))
}

#[utoipa::path(
    post,
    path = "/submit-questionnaire",
    request_body = SubmitQuestionnaireReq,
    responses(
        (status = 200, description = "Questionnaire submitted", body = SubmissionRes),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 409, description = "Session already submitted", body = ErrorResponse)
    )
)]
/// Submit a questionnaire
///
/// Answers are merged into the session's draft first. If required fields are
/// missing the draft keeps the merged answers and the response lists every
/// missing field.
#[axum::debug_handler]
pub(crate) async fn submit_questionnaire(
    State(state): State<AppState>,
    AppJson(req): AppJson<SubmitQuestionnaireReq>,
) -> Result<Json<SubmissionRes>, ApiError> {
    let submission = state.submissions.submit(req.session_id, req.answers)?;
    Ok(Json(submission.into()))
}

#[utoipa::path(
    get,
    path = "/submissions",
    params(ListSubmissionsQuery),
    responses(
        (status = 200, description = "Submissions, newest first", body = ListSubmissionsRes),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
/// List submissions for the therapist dashboard
#[axum::debug_handler]
pub(crate) async fn list_submissions(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListSubmissionsQuery>,
) -> Result<Json<ListSubmissionsRes>, ApiError> {
    let page = state.submissions.list(query.into())?;
    let has_more = page.has_more();

    Ok(Json(ListSubmissionsRes {
        success: true,
        submissions: page.items,
        total: page.total,
        limit: page.limit,
        offset: page.offset,
        has_more,
    }))
}

#[utoipa::path(
    get,
    path = "/submissions/{id}",
    params(
        ("id" = String, Path, description = "Submission id (32 lowercase hex characters)")
    ),
    responses(
        (status = 200, description = "The submission", body = SubmissionRes),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Unknown id", body = ErrorResponse)
    )
)]
/// Fetch one submission
#[axum::debug_handler]
pub(crate) async fn get_submission(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<SubmissionRes>, ApiError> {
    Ok(Json(state.submissions.get(&id)?.into()))
}

#[utoipa::path(
    post,
    path = "/submissions/{id}/review",
    params(
        ("id" = String, Path, description = "Submission id")
    ),
    responses(
        (status = 200, description = "Submission marked as reviewed", body = SubmissionRes),
        (status = 404, description = "Unknown id", body = ErrorResponse),
        (status = 409, description = "Submission is not in submitted state", body = ErrorResponse)
    )
)]
/// Mark a submission as reviewed
#[axum::debug_handler]
pub(crate) async fn review_submission(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<SubmissionRes>, ApiError> {
    Ok(Json(state.submissions.mark_reviewed(&id)?.into()))
}

#[utoipa::path(
    post,
    path = "/submissions/{id}/import",
    params(
        ("id" = String, Path, description = "Submission id")
    ),
    responses(
        (status = 200, description = "Submission imported into intake", body = SubmissionRes),
        (status = 404, description = "Unknown id", body = ErrorResponse),
        (status = 409, description = "Submission is not in reviewed state", body = ErrorResponse)
    )
)]
/// Mark a reviewed submission as imported into the intake workflow
#[axum::debug_handler]
pub(crate) async fn import_submission(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<SubmissionRes>, ApiError> {
    Ok(Json(state.submissions.mark_imported(&id)?.into()))
}

pub(crate) async fn not_found() -> ApiError {
    ErrorEnvelope::not_found("No such endpoint").into()
}

/// Known path, unsupported method.
pub(crate) async fn method_not_allowed() -> Response {
    let envelope = ErrorEnvelope::new(
        ErrorKind::ValidationError,
        "Method not allowed for this endpoint",
    )
    .with_suggestions(vec![
        "See /swagger-ui for the methods each endpoint accepts".into(),
    ]);
    let mut response = ApiError::from(envelope).into_response();
    *response.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
    response
}
