//! Weather tool backed by the OpenWeatherMap current-weather API.
//!
//! The API key is resolved once at construction time. A missing key or a
//! failed lookup comes back as an unsuccessful result with a readable
//! message; the model decides what to tell the user.

use async_trait::async_trait;
use convo_core::error::ToolError;
use convo_core::tool::{Tool, ToolResult};
use tracing::debug;

const API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

pub struct WeatherTool {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl WeatherTool {
    pub fn new(api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");
        Self { api_key, client }
    }

    /// Read the API key from `OPENWEATHERMAP_API_KEY`.
    pub fn from_env() -> Self {
        Self::new(std::env::var("OPENWEATHERMAP_API_KEY").ok())
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get current weather information for a city using OpenWeatherMap API"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "city": {"type": "string", "description": "City name (e.g., 'London', 'New York')"}
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let city = arguments["city"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'city' argument".into()))?;

        let Some(api_key) = &self.api_key else {
            return Ok(ToolResult::error(
                "Error: OPENWEATHERMAP_API_KEY not found in environment variables. \
                 Set it to enable weather lookups.",
            ));
        };

        debug!(city, "fetching weather");

        let response = match self
            .client
            .get(API_URL)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return Ok(ToolResult::error(format!("Error getting weather: {e}"))),
        };

        let status = response.status();
        let body: serde_json::Value = match response.json().await {
            Ok(b) => b,
            Err(e) => return Ok(ToolResult::error(format!("Error getting weather: {e}"))),
        };

        if !status.is_success() {
            let message = body["message"].as_str().unwrap_or("request failed");
            return Ok(ToolResult::error(format!("Weather API error: {message}")));
        }

        match format_report(&body) {
            Some(report) => Ok(ToolResult::ok(report).with_data(body)),
            None => Ok(ToolResult::error(
                "Weather API error: unexpected response format",
            )),
        }
    }
}

/// Render the OpenWeatherMap response as a readable report.
fn format_report(body: &serde_json::Value) -> Option<String> {
    let city = body["name"].as_str()?;
    let description = body["weather"][0]["description"].as_str()?;
    let temp = body["main"]["temp"].as_f64()?;
    let feels_like = body["main"]["feels_like"].as_f64()?;
    let humidity = body["main"]["humidity"].as_u64()?;

    Some(format!(
        "Weather in {city}:\nDescription: {description}\nTemperature: {temp:.1}\u{b0}C (feels like {feels_like:.1}\u{b0}C)\nHumidity: {humidity}%"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> serde_json::Value {
        serde_json::json!({
            "name": "London",
            "weather": [{"main": "Rain", "description": "light rain"}],
            "main": {"temp": 12.34, "feels_like": 11.02, "humidity": 81}
        })
    }

    #[test]
    fn formats_report() {
        let report = format_report(&sample_response()).unwrap();
        assert_eq!(
            report,
            "Weather in London:\nDescription: light rain\nTemperature: 12.3\u{b0}C (feels like 11.0\u{b0}C)\nHumidity: 81%"
        );
    }

    #[test]
    fn report_requires_all_fields() {
        let mut body = sample_response();
        body["main"].as_object_mut().unwrap().remove("humidity");
        assert!(format_report(&body).is_none());
    }

    #[tokio::test]
    async fn missing_api_key_is_a_tool_failure_not_an_error() {
        let tool = WeatherTool::new(None);
        let result = tool
            .execute(serde_json::json!({"city": "Paris"}))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.output.contains("OPENWEATHERMAP_API_KEY"));
    }

    #[tokio::test]
    async fn missing_city_argument() {
        let tool = WeatherTool::new(None);
        let result = tool.execute(serde_json::json!({})).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn tool_definition() {
        let tool = WeatherTool::new(None);
        let def = tool.to_definition();
        assert_eq!(def.name, "get_weather");
        assert_eq!(def.parameters["required"], serde_json::json!(["city"]));
    }
}
