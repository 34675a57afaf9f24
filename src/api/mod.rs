//! HTTP API surface
//!
//! Thin axum handlers over the planner and plan service. Each handler
//! resolves the bearer token to a principal up front and passes it down
//! explicitly; errors map to a JSON `{error}` payload with a matching
//! status code.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::TripAiError;
use crate::ai::{AiPlanner, VoicePlanResult};
use crate::auth::{Principal, PrincipalResolver};
use crate::models::{Expense, TravelPlan, TravelRequest};
use crate::plans::{ExpenseUpdate, NewExpense, NewTravelPlan, PlanService};

/// Shared handler state, wired once at startup
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<AiPlanner>,
    pub plans: Arc<PlanService>,
    pub auth: Arc<dyn PrincipalResolver>,
}

/// Error payload returned to clients
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Wrapper turning backend errors into HTTP responses
struct ApiError(TripAiError);

impl From<TripAiError> for ApiError {
    fn from(err: TripAiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TripAiError::Validation { .. } => StatusCode::BAD_REQUEST,
            TripAiError::NotFound { .. } => StatusCode::NOT_FOUND,
            TripAiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            _ => {
                error!("Request failed: {}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            error: self.0.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Unauthorized responses bypass the error enum: there is no principal yet
fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody {
            error: "Missing or invalid bearer token".to_string(),
        }),
    )
        .into_response()
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Principal, Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(unauthorized)?;

    state
        .auth
        .resolve(token)
        .await
        .map_err(|_| unauthorized())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateItineraryRequest {
    destination: String,
    start_date: String,
    end_date: String,
    budget: f64,
    traveler_count: u32,
    #[serde(default)]
    preferences: Vec<String>,
}

#[derive(Debug, Serialize)]
struct GenerateItineraryResponse {
    itinerary: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoicePlanRequest {
    voice_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoicePlanResponse {
    plan: TravelPlan,
    ai_analysis: VoicePlanResult,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    destination: Option<String>,
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/itinerary/generate", post(generate_itinerary))
        .route("/voice-plan/generate", post(generate_voice_plan))
        .route("/travel-plans", get(list_plans).post(create_plan))
        .route("/travel-plans/search", get(search_plans))
        .route("/travel-plans/{id}", get(get_plan).delete(delete_plan))
        .route("/expenses/plan/{plan_id}", get(list_expenses))
        .route("/expenses", post(create_expense))
        .route("/expenses/{id}", put(update_expense).delete(delete_expense))
        .with_state(state)
}

async fn generate_itinerary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<GenerateItineraryRequest>,
) -> Result<Json<GenerateItineraryResponse>, Response> {
    authenticate(&state, &headers).await?;

    let request = TravelRequest {
        destination: payload.destination,
        start_date: payload.start_date,
        end_date: payload.end_date,
        budget: payload.budget,
        traveler_count: payload.traveler_count,
        preferences: payload.preferences,
        travel_type: None,
        special_requirements: None,
    };

    let itinerary = state
        .planner
        .generate_itinerary(&request)
        .await
        .map_err(|e| ApiError(e).into_response())?;
    Ok(Json(GenerateItineraryResponse { itinerary }))
}

async fn generate_voice_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<VoicePlanRequest>,
) -> Result<Json<VoicePlanResponse>, Response> {
    let principal = authenticate(&state, &headers).await?;

    let analysis = state
        .planner
        .parse_voice_and_generate_plan(&payload.voice_text)
        .await
        .map_err(|e| ApiError(e).into_response())?;

    let plan = plan_from_analysis(&analysis, &principal).map_err(|e| ApiError(e).into_response())?;
    let plan = state
        .plans
        .save_generated_plan(plan)
        .await
        .map_err(|e| ApiError(e).into_response())?;

    Ok(Json(VoicePlanResponse {
        plan,
        ai_analysis: analysis,
    }))
}

/// Turn the pipeline output into a persistable plan for the caller
fn plan_from_analysis(
    analysis: &VoicePlanResult,
    principal: &Principal,
) -> crate::Result<TravelPlan> {
    let parsed = &analysis.parsed_info;
    let start_date: NaiveDate = parsed
        .start_date
        .parse()
        .map_err(|_| TripAiError::validation(format!("unparseable start date '{}'", parsed.start_date)))?;
    let end_date: NaiveDate = parsed
        .end_date
        .parse()
        .map_err(|_| TripAiError::validation(format!("unparseable end date '{}'", parsed.end_date)))?;

    Ok(TravelPlan {
        id: 0,
        user_id: principal.user_id,
        destination: parsed.destination.clone(),
        start_date,
        end_date,
        budget: parsed.budget,
        traveler_count: parsed.traveler_count,
        preferences: parsed.preferences.clone(),
        itinerary: analysis.itinerary.clone(),
        created_at: chrono::Utc::now(),
    })
}

async fn list_plans(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<TravelPlan>>, Response> {
    let principal = authenticate(&state, &headers).await?;
    let plans = state
        .plans
        .list_plans(&principal)
        .await
        .map_err(|e| ApiError(e).into_response())?;
    Ok(Json(plans))
}

async fn create_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewTravelPlan>,
) -> Result<Json<TravelPlan>, Response> {
    let principal = authenticate(&state, &headers).await?;
    let plan = state
        .plans
        .create_plan(&principal, payload)
        .await
        .map_err(|e| ApiError(e).into_response())?;
    Ok(Json(plan))
}

async fn search_plans(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<TravelPlan>>, Response> {
    let principal = authenticate(&state, &headers).await?;
    let plans = state
        .plans
        .search_plans(&principal, query.destination.as_deref())
        .await
        .map_err(|e| ApiError(e).into_response())?;
    Ok(Json(plans))
}

async fn get_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<TravelPlan>, Response> {
    let principal = authenticate(&state, &headers).await?;
    let plan = state
        .plans
        .get_plan(&principal, id)
        .await
        .map_err(|e| ApiError(e).into_response())?;
    Ok(Json(plan))
}

async fn delete_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<StatusCode, Response> {
    let principal = authenticate(&state, &headers).await?;
    state
        .plans
        .delete_plan(&principal, id)
        .await
        .map_err(|e| ApiError(e).into_response())?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_expenses(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(plan_id): Path<u64>,
) -> Result<Json<Vec<Expense>>, Response> {
    let principal = authenticate(&state, &headers).await?;
    let expenses = state
        .plans
        .list_expenses(&principal, plan_id)
        .await
        .map_err(|e| ApiError(e).into_response())?;
    Ok(Json(expenses))
}

async fn create_expense(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewExpense>,
) -> Result<Json<Expense>, Response> {
    let principal = authenticate(&state, &headers).await?;
    let expense = state
        .plans
        .add_expense(&principal, payload)
        .await
        .map_err(|e| ApiError(e).into_response())?;
    Ok(Json(expense))
}

async fn update_expense(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<Expense>, Response> {
    let principal = authenticate(&state, &headers).await?;
    let expense = state
        .plans
        .update_expense(&principal, id, payload)
        .await
        .map_err(|e| ApiError(e).into_response())?;
    Ok(Json(expense))
}

async fn delete_expense(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<StatusCode, Response> {
    let principal = authenticate(&state, &headers).await?;
    state
        .plans
        .delete_expense(&principal, id)
        .await
        .map_err(|e| ApiError(e).into_response())?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{GenerationOutcome, TextGenerator, UnavailableReason};
    use crate::auth::StaticTokenResolver;
    use crate::config::DefaultsConfig;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use axum::http::HeaderValue;

    struct Unreachable;

    #[async_trait]
    impl TextGenerator for Unreachable {
        async fn generate(&self, _prompt: &str) -> GenerationOutcome {
            GenerationOutcome::Unavailable(UnavailableReason::NotConfigured)
        }
    }

    fn test_state() -> AppState {
        let store = Arc::new(MemoryStore::new());
        let planner = Arc::new(AiPlanner::new(
            Arc::new(Unreachable),
            DefaultsConfig::default(),
        ));
        let plans = Arc::new(PlanService::new(store.clone(), store, planner.clone()));
        let auth = Arc::new(StaticTokenResolver::new().with_token(
            "token-alice",
            Principal {
                user_id: 1,
                username: "alice".to_string(),
            },
        ));
        AppState {
            planner,
            plans,
            auth,
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn test_authenticate_known_token() {
        let state = test_state();
        let principal = authenticate(&state, &bearer("token-alice")).await.unwrap();
        assert_eq!(principal.username, "alice");
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unknown_token() {
        let state = test_state();
        assert!(authenticate(&state, &bearer("wrong")).await.is_err());
        assert!(authenticate(&state, &HeaderMap::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_plan_from_analysis_parses_dates() {
        let state = test_state();
        let analysis = state
            .planner
            .parse_voice_and_generate_plan("想去东京，两个人，预算2万")
            .await
            .unwrap();
        let principal = Principal {
            user_id: 1,
            username: "alice".to_string(),
        };

        let plan = plan_from_analysis(&analysis, &principal).unwrap();
        assert_eq!(plan.user_id, 1);
        assert_eq!(plan.destination, "日本东京");
        assert!(plan.end_date > plan.start_date);
        assert!(!plan.itinerary.is_empty());
    }

    #[tokio::test]
    async fn test_plan_from_analysis_rejects_bad_dates() {
        let state = test_state();
        let mut analysis = state
            .planner
            .parse_voice_and_generate_plan("想去东京")
            .await
            .unwrap();
        analysis.parsed_info.start_date = "下周".to_string();

        let principal = Principal {
            user_id: 1,
            username: "alice".to_string(),
        };
        assert!(plan_from_analysis(&analysis, &principal).is_err());
    }
}
