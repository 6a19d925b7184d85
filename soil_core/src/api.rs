//! # Request Boundary
//!
//! Maps the engine onto request/response semantics for a web or CLI caller:
//!
//! | Outcome | Status | Body |
//! |---------|--------|------|
//! | Profile computed | 200 | `points` (rounded), `layers` |
//! | Structural / missing weight / invalid input | 400 | engine message |
//! | Body is not valid JSON for the request schema | 422 | parser message |
//! | Panic or non-finite result | 500 | `"Internal server error: <Kind>"` |
//!
//! Internal faults are logged in full with `tracing::error!`; the response
//! only discloses the fault kind.
//!
//! ## Example
//!
//! ```rust
//! use soil_core::api::handle_json;
//! use soil_core::settings::EngineSettings;
//!
//! let body = r#"{
//!     "layers": [
//!         { "thickness": 5.0, "unit_weight_natural": 18.0, "unit_weight_saturated": 20.0 }
//!     ],
//!     "global_water_table_depth": 2.0
//! }"#;
//! let reply = handle_json(body, &EngineSettings::default());
//! assert_eq!(reply.status, 200);
//! assert_eq!(reply.body.points.last().unwrap().effective_vertical_stress, 66.0);
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::cache::{fingerprint, CacheStats, ProfileCache};
use crate::errors::{SoilError, SoilResult};
use crate::settings::EngineSettings;
use crate::stresses::{
    calculate, LayerSummary, StressPoint, StressProfileInput, StressProfileResult,
};

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_UNPROCESSABLE: u16 = 422;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Request body of a stress-profile calculation.
pub type StressProfileRequest = StressProfileInput;

/// Response body: points on success, an error message otherwise.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StressProfileResponse {
    #[serde(default)]
    pub points: Vec<StressPoint>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<LayerSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Stable machine-readable code, see [`SoilError::error_code`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl StressProfileResponse {
    fn success(result: StressProfileResult) -> Self {
        StressProfileResponse {
            points: result.points,
            layers: result.layers,
            ..Default::default()
        }
    }

    fn failure(message: String, code: &str) -> Self {
        StressProfileResponse {
            error: Some(message),
            error_code: Some(code.to_string()),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Status code plus response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiReply {
    pub status: u16,
    pub body: StressProfileResponse,
}

impl ApiReply {
    fn ok(result: StressProfileResult) -> Self {
        ApiReply {
            status: STATUS_OK,
            body: StressProfileResponse::success(result),
        }
    }

    fn from_error(err: &SoilError) -> Self {
        if err.is_client_error() {
            return ApiReply {
                status: STATUS_BAD_REQUEST,
                body: StressProfileResponse::failure(err.to_string(), err.error_code()),
            };
        }

        // Anything else is a server fault: disclose the kind only
        let disclosed = match err {
            SoilError::Internal { .. } => err.clone(),
            other => SoilError::internal(other.kind_name()),
        };
        ApiReply {
            status: STATUS_INTERNAL_ERROR,
            body: StressProfileResponse::failure(disclosed.to_string(), disclosed.error_code()),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Run the engine with panic containment, finiteness check and rounding.
fn compute(
    request: &StressProfileRequest,
    settings: &EngineSettings,
) -> SoilResult<StressProfileResult> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| calculate(request, settings)));
    let result = match outcome {
        Ok(result) => result?,
        Err(payload) => {
            error!(detail = %panic_message(payload.as_ref()), "stress engine panicked");
            return Err(SoilError::internal("Panic"));
        }
    };

    if !result.is_finite() {
        error!(points = result.points.len(), "stress profile contains non-finite values");
        return Err(SoilError::internal("NonFiniteResult"));
    }
    Ok(result.rounded(settings.output_decimals))
}

/// Answer a stress-profile request.
pub fn handle(request: &StressProfileRequest, settings: &EngineSettings) -> ApiReply {
    match compute(request, settings) {
        Ok(result) => ApiReply::ok(result),
        Err(err) => {
            if !err.is_client_error() {
                error!(error = %err, code = err.error_code(), "stress profile request failed");
            }
            ApiReply::from_error(&err)
        }
    }
}

/// Answer a raw JSON request body.
///
/// A body that does not deserialize into a [`StressProfileRequest`] is
/// rejected with 422 before the engine runs.
pub fn handle_json(body: &str, settings: &EngineSettings) -> ApiReply {
    match serde_json::from_str::<StressProfileRequest>(body) {
        Ok(request) => handle(&request, settings),
        Err(e) => {
            let err = SoilError::from(e);
            debug!(error = %err, "request body rejected");
            ApiReply {
                status: STATUS_UNPROCESSABLE,
                body: StressProfileResponse::failure(err.to_string(), err.error_code()),
            }
        }
    }
}

static PROFILE_CACHE: Lazy<Mutex<ProfileCache>> =
    Lazy::new(|| Mutex::new(ProfileCache::default()));

fn with_cache<T>(f: impl FnOnce(&mut ProfileCache) -> T) -> T {
    // A poisoned lock only means another request panicked mid-update
    let mut cache = PROFILE_CACHE.lock().unwrap_or_else(|e| e.into_inner());
    f(&mut cache)
}

/// Like [`handle`], memoizing successful profiles in a process-wide LRU cache.
pub fn handle_cached(request: &StressProfileRequest, settings: &EngineSettings) -> ApiReply {
    let key = match fingerprint(request, settings) {
        Ok(key) => key,
        Err(_) => return handle(request, settings),
    };

    if let Some(result) = with_cache(|cache| cache.get(&key)) {
        return ApiReply::ok(result);
    }

    match compute(request, settings) {
        Ok(result) => {
            with_cache(|cache| cache.insert(key, result.clone()));
            ApiReply::ok(result)
        }
        Err(err) => {
            if !err.is_client_error() {
                error!(error = %err, code = err.error_code(), "stress profile request failed");
            }
            ApiReply::from_error(&err)
        }
    }
}

/// Counters of the process-wide cache.
pub fn cache_stats() -> CacheStats {
    with_cache(|cache| cache.stats())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stresses::SoilLayer;

    fn crossing_profile() -> StressProfileRequest {
        StressProfileInput::new(vec![SoilLayer::with_weights(5.0, Some(18.0), Some(20.0))])
            .with_water_table(2.0, 0.0)
    }

    #[test]
    fn test_success_is_rounded() {
        let request =
            StressProfileInput::new(vec![SoilLayer::new(1.0 / 3.0, 18.0).lateral(1.0 / 3.0)]);
        let reply = handle(&request, &EngineSettings::default());
        assert_eq!(reply.status, STATUS_OK);
        let base = reply.body.points.last().unwrap();
        assert_eq!(base.depth, 0.3333);
        assert_eq!(base.effective_horizontal_stress, 2.0);
        assert!(reply.body.error.is_none());
    }

    #[test]
    fn test_missing_weight_is_bad_request() {
        let request = StressProfileInput::new(vec![SoilLayer::with_weights(3.0, None, Some(20.0))])
            .with_water_table(1.0, 0.0);
        let reply = handle(&request, &EngineSettings::default());
        assert_eq!(reply.status, STATUS_BAD_REQUEST);
        assert!(reply.body.points.is_empty());
        assert_eq!(reply.body.error_code.as_deref(), Some("MISSING_UNIT_WEIGHT"));
        let message = reply.body.error.unwrap();
        assert!(message.contains("Layer 1"), "{}", message);
        assert!(message.contains("natural"), "{}", message);
    }

    #[test]
    fn test_empty_profile_is_bad_request() {
        let reply = handle(&StressProfileInput::new(vec![]), &EngineSettings::default());
        assert_eq!(reply.status, STATUS_BAD_REQUEST);
        assert_eq!(reply.body.error_code.as_deref(), Some("STRUCTURAL_ERROR"));
    }

    #[test]
    fn test_malformed_json_is_unprocessable() {
        let reply = handle_json(r#"{ "layers": "not a list" }"#, &EngineSettings::default());
        assert_eq!(reply.status, STATUS_UNPROCESSABLE);
        assert!(reply.body.error.is_some());
    }

    #[test]
    fn test_internal_error_discloses_kind_only() {
        let err = SoilError::file_error("read", "/secret/path.stm", "permission denied");
        let reply = ApiReply::from_error(&err);
        assert_eq!(reply.status, STATUS_INTERNAL_ERROR);
        assert_eq!(reply.body.error.as_deref(), Some("Internal server error: FileError"));

        let reply = ApiReply::from_error(&SoilError::internal("NonFiniteResult"));
        assert_eq!(reply.body.error.as_deref(), Some("Internal server error: NonFiniteResult"));
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        let request = StressProfileInput::new(vec![SoilLayer::new(2.0, f64::INFINITY)]);
        let reply = handle(&request, &EngineSettings::default());
        assert_eq!(reply.status, STATUS_BAD_REQUEST);
    }

    #[test]
    fn test_non_finite_profile_is_internal_error() {
        // Finite inputs whose stresses overflow to infinity
        let request = StressProfileInput::new(vec![SoilLayer::new(1e308, 18.0)]);
        let reply = handle(&request, &EngineSettings::default());
        assert_eq!(reply.status, STATUS_INTERNAL_ERROR);
        assert!(!reply.body.is_success());
        assert!(reply.body.points.is_empty());
        assert_eq!(reply.body.error_code.as_deref(), Some("INTERNAL_ERROR"));
        assert_eq!(
            reply.body.error.as_deref(),
            Some("Internal server error: NonFiniteResult")
        );

        let settings = EngineSettings::default().with_depth_tolerance(5.3e-4);
        let key = fingerprint(&request, &settings).unwrap();
        assert_eq!(handle_cached(&request, &settings).status, STATUS_INTERNAL_ERROR);
        assert!(with_cache(|cache| cache.get(&key)).is_none());
    }

    #[test]
    fn test_panic_message_payloads() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }

    #[test]
    fn test_cached_reply_matches_uncached() {
        // Unique tolerance keeps this key apart from other tests sharing the cache
        let settings = EngineSettings::default().with_depth_tolerance(3.7e-4);
        let request = crossing_profile();

        let first = handle_cached(&request, &settings);
        let second = handle_cached(&request, &settings);
        assert_eq!(first, second);
        assert_eq!(first, handle(&request, &settings));
        assert!(cache_stats().hits >= 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let settings = EngineSettings::default().with_depth_tolerance(4.1e-4);
        let request = StressProfileInput::new(vec![]);
        let key = fingerprint(&request, &settings).unwrap();

        assert_eq!(handle_cached(&request, &settings).status, STATUS_BAD_REQUEST);
        assert!(with_cache(|cache| cache.get(&key)).is_none());
    }

    #[test]
    fn test_response_json_shape() {
        let reply = handle(&crossing_profile(), &EngineSettings::default());
        let json = serde_json::to_value(&reply.body).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["points"][1]["depth"], 2.0);
        assert_eq!(json["points"][1]["kind"], "WaterTable");
        assert_eq!(json["layers"][0]["piezometry"]["regime"], "GlobalTable");
    }
}
