// API client module: a small blocking HTTP client for the hosted chat
// completions endpoint. One call per lookup; retries live in `retry`.

use crate::config::{Settings, MODEL, TEMPERATURE};
use crate::error::{Error, Result};
use crate::prompt::{self, Message};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Something that can describe a first name. The loop only depends on this,
/// so tests can swap in a fake.
pub trait NameLookup {
    /// Return a short description of `name`'s meaning and origin.
    fn describe(&self, name: &str) -> Result<String>;
}

/// Client for the chat completions API, built once at startup.
pub struct OpenAiClient {
    client: Client,
    url: String,
    api_key: String,
}

/// Request body. Fields mirror the chat completions API.
#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    messages: &'a [Message],
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

/// `content` is nullable in the API (e.g. refusals or tool calls).
#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Build a client from resolved settings. The timeout applies to the
    /// whole request, connect included.
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(OpenAiClient {
            client,
            url: settings.completions_url(),
            api_key: settings.api_key.clone(),
        })
    }
}

impl NameLookup for OpenAiClient {
    fn describe(&self, name: &str) -> Result<String> {
        let messages = prompt::messages(name);
        let body = ChatRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            messages: &messages,
        };
        debug!(model = MODEL, name_len = name.chars().count(), "sending completion request");

        let res = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().unwrap_or_default();
            debug!(status, "completion request rejected");
            return Err(Error::Api { status, body });
        }

        let parsed: ChatResponse = res.json()?;
        first_choice_text(parsed)
    }
}

/// Trimmed text of the first choice; later choices are ignored.
fn first_choice_text(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|text| text.trim().to_string())
        .ok_or(Error::EmptyCompletion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    fn parse(json: &str) -> ChatResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn request_body_carries_model_temperature_and_both_messages() {
        let messages = prompt::messages("Amara");
        let body = ChatRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            messages: &messages,
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["temperature"], 0.3);
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
        assert_eq!(json["messages"][0]["content"], prompt::SYSTEM_INSTRUCTIONS);
        assert!(json["messages"][1]["content"]
            .as_str()
            .unwrap()
            .contains("First name: Amara"));
    }

    #[test]
    fn first_choice_is_trimmed() {
        let response = parse(
            r#"{
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": "\n  Meaning: Grace.\nOrigin: Igbo.\nVariants: Amarachi  \n"
                    },
                    "finish_reason": "stop"
                }]
            }"#,
        );
        assert_eq!(
            first_choice_text(response).unwrap(),
            "Meaning: Grace.\nOrigin: Igbo.\nVariants: Amarachi"
        );
    }

    #[test]
    fn only_the_first_of_several_choices_is_used() {
        let response = parse(
            r#"{"choices": [
                {"message": {"role": "assistant", "content": "first"}},
                {"message": {"role": "assistant", "content": "second"}}
            ]}"#,
        );
        assert_eq!(first_choice_text(response).unwrap(), "first");
    }

    #[test]
    fn no_choices_is_an_error() {
        let response = parse(r#"{"choices": []}"#);
        assert!(matches!(first_choice_text(response), Err(Error::EmptyCompletion)));
    }

    #[test]
    fn null_content_is_an_error() {
        let response = parse(r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#);
        assert!(matches!(first_choice_text(response), Err(Error::EmptyCompletion)));
    }

    #[test]
    fn response_without_choices_field_does_not_parse() {
        let result: std::result::Result<ChatResponse, _> =
            serde_json::from_str(r#"{"error": {"message": "bad key"}}"#);
        assert!(result.is_err());
    }

    /// Serve exactly one HTTP response on a local port and hand back the
    /// raw request that came in.
    fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}/v1", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut head = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                head.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let mut payload = vec![0; content_length];
            reader.read_exact(&mut payload).unwrap();

            write!(
                stream,
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();

            head + &String::from_utf8(payload).unwrap()
        });
        (base_url, handle)
    }

    fn client_for(base_url: String) -> OpenAiClient {
        OpenAiClient::new(&Settings {
            api_key: "sk-test".into(),
            base_url,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn describe_posts_to_the_completions_endpoint_and_trims_the_answer() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"  hi \n"}}]}"#,
        );

        let answer = client_for(base_url).describe("Amara");
        let request = server.join().unwrap();

        assert_eq!(answer.unwrap(), "hi");
        assert!(request.starts_with("POST /v1/chat/completions HTTP/1.1"));
        assert!(request
            .to_ascii_lowercase()
            .contains("authorization: bearer sk-test"));
        assert!(request.contains("First name: Amara"));
        assert!(request.contains("\"model\":\"gpt-4o-mini\""));
    }

    #[test]
    fn non_success_status_becomes_api_error_with_body() {
        let (base_url, server) = serve_once("429 Too Many Requests", r#"{"error":"slow"}"#);

        let result = client_for(base_url).describe("Amara");
        server.join().unwrap();

        match result {
            Err(Error::Api { status, body }) => {
                assert_eq!(status, 429);
                assert_eq!(body, r#"{"error":"slow"}"#);
            }
            other => panic!("expected an API error, got {other:?}"),
        }
    }

    #[test]
    fn undecodable_success_body_is_an_http_error() {
        let (base_url, server) = serve_once("200 OK", "not json");

        let result = client_for(base_url).describe("Amara");
        server.join().unwrap();

        assert!(matches!(result, Err(Error::Http(_))));
    }
}
