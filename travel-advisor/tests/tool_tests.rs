use proptest::prelude::*;
use travel_advisor::tools::{get_exchange_rate, get_local_attractions, get_weather};
use travel_advisor::{ToolOutcome, ToolStatus};

const CODES: [&str; 8] = ["USD", "EUR", "GBP", "JPY", "KRW", "LAK", "THB", "CNY"];

fn status_of<T: serde::Serialize>(outcome: &ToolOutcome<T>) -> String {
    let json = serde_json::to_value(outcome).unwrap();
    json["status"].as_str().unwrap().to_string()
}

fn assert_valid_status(status: &str) {
    assert!(
        ToolStatus::ALL.iter().any(|s| s.as_str() == status),
        "unexpected status {status}"
    );
}

proptest! {
    #[test]
    fn weather_status_is_always_valid(input in ".{0,40}") {
        let first = get_weather(&input);
        assert_valid_status(&status_of(&first));
        prop_assert_eq!(first, get_weather(&input));
    }

    #[test]
    fn attractions_status_is_always_valid(input in ".{0,40}") {
        let first = get_local_attractions(&input);
        assert_valid_status(&status_of(&first));
        prop_assert_eq!(first, get_local_attractions(&input));
    }

    #[test]
    fn exchange_status_is_always_valid(base in ".{0,6}", target in ".{0,6}") {
        let first = get_exchange_rate(&base, &target);
        assert_valid_status(&status_of(&first));
        prop_assert_eq!(first, get_exchange_rate(&base, &target));
    }

    #[test]
    fn known_currencies_always_resolve(
        base in prop::sample::select(CODES.to_vec()),
        target in prop::sample::select(CODES.to_vec()),
        lower in any::<bool>(),
    ) {
        let base = if lower { base.to_ascii_lowercase() } else { base.to_string() };
        let outcome = get_exchange_rate(&base, target);
        prop_assert!(outcome.is_success());
        prop_assert!(outcome.value.unwrap().rate > 0.0);
    }
}

#[test]
fn test_outcome_json_is_flat() {
    let json = serde_json::to_value(get_weather("Laos")).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["location"], "Vientiane");
    assert!(json.get("message").is_none());

    let json = serde_json::to_value(get_weather("Atlantis")).unwrap();
    assert_eq!(json["status"], "not_found");
    assert_eq!(json["message"], "Weather information for 'Atlantis' is not available.");
}

#[test]
fn test_blank_input_is_an_error() {
    assert_eq!(get_weather("   ").status, ToolStatus::Error);
    assert_eq!(get_local_attractions("").status, ToolStatus::Error);
    assert_eq!(get_exchange_rate("", "USD").status, ToolStatus::Error);
}
