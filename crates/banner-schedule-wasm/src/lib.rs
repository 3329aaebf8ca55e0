//! WASM bindings for banner-schedule.
//!
//! Exposes activation resolution, free-gap search and clock-range conversion
//! to the dashboard via `wasm-bindgen`. Complex types cross the boundary as
//! JSON strings using the same camelCase field names the dashboard stores.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p banner-schedule-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/banner-schedule-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/banner_schedule_wasm.wasm
//! ```

use banner_schedule::{
    free_gaps, resolve_request, ActivationRequest, ClockRange, FreeGap, TimeWindow,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// JSON-in, JSON-out helpers (callable from native tests)
// ---------------------------------------------------------------------------

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn resolve_activation_json(request_json: &str) -> Result<String, String> {
    let request: ActivationRequest = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid activation request JSON: {}", e))?;
    let outcome = resolve_request(&request).map_err(|e| e.to_string())?;
    to_json(&outcome)
}

fn free_gaps_json(windows_json: &str, min_duration_minutes: Option<u32>) -> Result<String, String> {
    let windows: Vec<TimeWindow> = serde_json::from_str(windows_json)
        .map_err(|e| format!("Invalid windows JSON: {}", e))?;
    let min = min_duration_minutes.unwrap_or(1);
    let gaps: Vec<FreeGap> = free_gaps(&windows)
        .into_iter()
        .filter(|g| g.duration_minutes >= min)
        .collect();
    to_json(&gaps)
}

fn from_clock_range_json(range_json: &str) -> Result<String, String> {
    let range: ClockRange = serde_json::from_str(range_json)
        .map_err(|e| format!("Invalid clock range JSON: {}", e))?;
    let window = range.to_window().map_err(|e| e.to_string())?;
    to_json(&window)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Resolve an activation request.
///
/// `request_json` is `{bannerId, proposedWindow, otherActiveWindows?,
/// minSlotMinutes?}`. Returns `{"outcome":"accepted"|"adjusted","window":{..}}`
/// or `{"outcome":"no_space"}`.
#[wasm_bindgen(js_name = "resolveActivation")]
pub fn resolve_activation(request_json: &str) -> Result<String, JsValue> {
    resolve_activation_json(request_json).map_err(|e| JsValue::from_str(&e))
}

/// Free gaps of the day around a JSON array of `{startMinute, endMinute}`
/// windows, optionally only those at least `min_duration_minutes` long.
#[wasm_bindgen(js_name = "findFreeGaps")]
pub fn find_free_gaps(
    windows_json: &str,
    min_duration_minutes: Option<u32>,
) -> Result<String, JsValue> {
    free_gaps_json(windows_json, min_duration_minutes).map_err(|e| JsValue::from_str(&e))
}

/// Minute offsets to `{startTime, endTime, endsNextDay}`.
#[wasm_bindgen(js_name = "toClockRange")]
pub fn to_clock_range(start_minute: u32, end_minute: u32) -> Result<String, JsValue> {
    to_json(&ClockRange::from_minutes(start_minute, end_minute)).map_err(|e| JsValue::from_str(&e))
}

/// `{startTime, endTime, endsNextDay}` back to a validated window.
#[wasm_bindgen(js_name = "fromClockRange")]
pub fn from_clock_range(range_json: &str) -> Result<String, JsValue> {
    from_clock_range_json(range_json).map_err(|e| JsValue::from_str(&e))
}
