use serde_json::{json, Value};

use lumo::api::models::{
    content_from_message, format_tool_declarations, Content, GenerateRequest, GenerateResponse,
    GenerationConfig, WirePart,
};
use lumo::api::ToolDeclaration;
use lumo::models::{Message, Part};

#[test]
fn request_body_uses_the_expected_wire_shape() {
    let history = vec![
        Message::system("ignored here"),
        Message::user("What is 2+2?"),
        Message::model("4"),
    ];

    let contents: Vec<Content> = history.iter().filter_map(content_from_message).collect();

    let request = GenerateRequest {
        contents,
        system_instruction: Some(Content {
            role: Some("system".to_string()),
            parts: vec![WirePart {
                text: Some("You are helpful.".to_string()),
                ..Default::default()
            }],
        }),
        generation_config: GenerationConfig { temperature: 1.0 },
        tools: Some(format_tool_declarations(&[ToolDeclaration {
            name: "get_weather".to_string(),
            description: "Look up the weather".to_string(),
            parameters: json!({ "type": "object" }),
        }])),
    };

    let body = serde_json::to_value(&request).unwrap();

    // System messages ride in systemInstruction, never in contents.
    assert_eq!(body["contents"].as_array().unwrap().len(), 2);
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "What is 2+2?");
    assert_eq!(body["contents"][1]["role"], "model");

    assert_eq!(
        body["systemInstruction"]["parts"][0]["text"],
        "You are helpful."
    );
    assert_eq!(body["generationConfig"]["temperature"], 1.0);
    assert_eq!(
        body["tools"][0]["functionDeclarations"][0]["name"],
        "get_weather"
    );
}

#[test]
fn tool_results_serialize_as_function_responses() {
    let message = Message::tool(vec![Part::ToolResult {
        name: "get_weather".to_string(),
        result: json!({ "temp": "20C" }).as_object().cloned().unwrap(),
    }]);

    let content = content_from_message(&message).unwrap();
    let body = serde_json::to_value(&content).unwrap();

    // Function responses travel under the user role.
    assert_eq!(body["role"], "user");
    assert_eq!(body["parts"][0]["functionResponse"]["name"], "get_weather");
    assert_eq!(
        body["parts"][0]["functionResponse"]["response"]["temp"],
        "20C"
    );
    assert!(body["parts"][0].get("text").is_none());
}

#[test]
fn response_parts_deserialize_into_domain_parts() {
    let raw = json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    { "text": "Let me check." },
                    { "functionCall": { "name": "get_weather", "args": { "city": "Kyoto" } } }
                ]
            }
        }]
    });

    let response: GenerateResponse = serde_json::from_value(raw).unwrap();
    let content = response.candidates[0].content.as_ref().unwrap();

    let parts: Vec<Part> = content.parts.iter().filter_map(WirePart::to_part).collect();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0], Part::text("Let me check."));
    assert_eq!(
        parts[1],
        Part::ToolCall {
            name: "get_weather".to_string(),
            arguments: json!({ "city": "Kyoto" }).as_object().cloned().unwrap(),
        }
    );
}

#[test]
fn missing_candidates_deserialize_to_empty() {
    let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();
    assert!(response.candidates.is_empty());

    // A candidate with no content yields no parts either.
    let response: GenerateResponse =
        serde_json::from_value(json!({ "candidates": [{}] })).unwrap();
    assert!(response.candidates[0].content.is_none());
}

#[test]
fn function_call_args_default_to_empty() {
    let part: WirePart =
        serde_json::from_value(json!({ "functionCall": { "name": "time_now" } })).unwrap();

    match part.to_part() {
        Some(Part::ToolCall { name, arguments }) => {
            assert_eq!(name, "time_now");
            assert!(arguments.is_empty());
        }
        other => panic!("expected ToolCall, got {:?}", other),
    }
}

#[test]
fn unknown_wire_parts_map_to_nothing() {
    let part: WirePart = serde_json::from_value(json!({})).unwrap();
    assert!(part.to_part().is_none());

    let value: Value = json!({ "inlineData": { "mimeType": "image/png" } });
    let part: WirePart = serde_json::from_value(value).unwrap();
    assert!(part.to_part().is_none());
}
