use api_contract::{ApiResponse, ClearResultDto};
use serde_json::json;

#[test]
fn success_envelope_wraps_data() {
    let response = ApiResponse::success(ClearResultDto {
        cleared_devices: 2,
        cleared_alerts: 5,
    });
    assert!(response.success);
    assert!(response.error.is_none());
    let value = serde_json::to_value(response).expect("serialize");
    assert_eq!(
        value,
        json!({
            "success": true,
            "data": {"clearedDevices": 2, "clearedAlerts": 5},
            "error": null
        })
    );
}

#[test]
fn error_envelope_has_code_and_message() {
    let response = ApiResponse::<()>::error("RESOURCE.NOT_FOUND", "not found");
    assert!(!response.success);
    assert!(response.data.is_none());
    let value = serde_json::to_value(response).expect("serialize");
    assert_eq!(value["error"]["code"], json!("RESOURCE.NOT_FOUND"));
    assert_eq!(value["data"], json!(null));
}
