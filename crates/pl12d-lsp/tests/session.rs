//! End-to-end sessions over in-memory framed streams.

use std::io::Cursor;

use pl12d_lsp::transport::{read_message, write_message};
use pl12d_lsp::{FramingError, Phase, Server, ServerConfig, ServerError};
use serde_json::{json, Value};

const ADD: &str = "Integer Add(Integer augend, Integer addend) {
    return augend + addend;
}
void main() {
    Integer result = Add(1, 2);
}
";

fn frame(messages: &[Value]) -> Vec<u8> {
    let mut input = Vec::new();
    for message in messages {
        write_message(&mut input, message.to_string().as_bytes()).unwrap();
    }
    input
}

fn run(messages: &[Value]) -> (Server, Vec<Value>) {
    let mut server = Server::new(ServerConfig::default()).unwrap();
    let mut output = Vec::new();
    server
        .serve(Cursor::new(frame(messages)), &mut output)
        .unwrap();

    let mut reader = Cursor::new(output);
    let mut responses = Vec::new();
    while let Some(body) = read_message(&mut reader).unwrap() {
        responses.push(serde_json::from_slice(&body).unwrap());
    }
    (server, responses)
}

fn request(id: i64, method: &str, params: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params})
}

fn notification(method: &str, params: Value) -> Value {
    json!({"jsonrpc": "2.0", "method": method, "params": params})
}

fn did_open(uri: &str, text: &str) -> Value {
    notification(
        "textDocument/didOpen",
        json!({"textDocument": {"uri": uri, "languageId": "12dpl", "version": 1, "text": text}}),
    )
}

#[test]
fn test_initialize_handshake() {
    let (_, responses) = run(&[
        request(1, "initialize", json!({"processId": null, "capabilities": {}})),
        notification("initialized", json!({})),
    ]);

    assert_eq!(responses.len(), 1);
    let response = &responses[0];
    assert_eq!(response["jsonrpc"], "2.0");
    assert_eq!(response["id"], 1);
    let capabilities = &response["result"]["capabilities"];
    assert_eq!(capabilities["textDocumentSync"], 1);
    assert_eq!(capabilities["completionProvider"]["resolveProvider"], true);
    assert_eq!(capabilities["definitionProvider"], true);
    assert_eq!(capabilities["documentFormattingProvider"], true);
    assert_eq!(capabilities["hoverProvider"], true);
}

#[test]
fn test_definition_of_parameter_reference() {
    let (_, responses) = run(&[
        did_open("file:///macros/add.4dm", ADD),
        request(
            2,
            "textDocument/definition",
            json!({"textDocument": {"uri": "file:///macros/add.4dm"}, "position": {"line": 1, "character": 11}}),
        ),
    ]);

    assert_eq!(responses.len(), 1);
    assert_eq!(
        responses[0]["result"]["range"],
        json!({"start": {"line": 0, "character": 20}, "end": {"line": 0, "character": 26}})
    );
}

#[test]
fn test_definition_follows_latest_change() {
    let changed = "Integer Foo() {\n    return 1;\n}\nvoid main() {\n    Foo();\n}\n";
    let (_, responses) = run(&[
        did_open("file:///macros/add.4dm", ADD),
        notification(
            "textDocument/didChange",
            json!({
                "textDocument": {"uri": "file:///macros/add.4dm", "version": 2},
                "contentChanges": [{"text": changed}]
            }),
        ),
        request(
            3,
            "textDocument/definition",
            json!({"textDocument": {"uri": "file:///macros/add.4dm"}, "position": {"line": 4, "character": 5}}),
        ),
    ]);

    assert_eq!(
        responses[0]["result"]["range"],
        json!({"start": {"line": 0, "character": 8}, "end": {"line": 0, "character": 11}})
    );
}

#[test]
fn test_formatting_empty_parens() {
    let (_, responses) = run(&[
        did_open("file:///macros/main.4dm", "void main() {\n    Foo( );\n}\n"),
        request(
            4,
            "textDocument/formatting",
            json!({"textDocument": {"uri": "file:///macros/main.4dm"}, "options": {"tabSize": 4, "insertSpaces": true}}),
        ),
    ]);

    assert_eq!(
        responses[0]["result"],
        json!([{
            "range": {"start": {"line": 1, "character": 8}, "end": {"line": 1, "character": 9}},
            "newText": ""
        }])
    );
}

#[test]
fn test_unknown_and_reserved_methods() {
    let (_, responses) = run(&[
        request(5, "textDocument/rename", json!({})),
        request(6, "$/progress", json!({})),
    ]);

    assert_eq!(responses.len(), 2);
    for (response, id) in responses.iter().zip([5, 6]) {
        assert_eq!(response["id"], id);
        assert_eq!(response["error"]["code"], -32601);
        assert!(response.get("result").is_none());
    }
}

#[test]
fn test_notifications_produce_no_output() {
    let (_, responses) = run(&[
        notification("initialized", json!({})),
        did_open("file:///macros/add.4dm", ADD),
        notification("$/cancelRequest", json!({"id": 1})),
        notification("workspace/didChangeWatchedFiles", json!({"changes": []})),
    ]);
    assert!(responses.is_empty());
}

#[test]
fn test_shutdown_then_exit_stops_the_loop() {
    let (server, responses) = run(&[
        request(7, "shutdown", Value::Null),
        notification("exit", Value::Null),
        request(8, "initialize", json!({"capabilities": {}})),
    ]);

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 7);
    assert_eq!(responses[0]["result"], Value::Null);
    assert!(responses[0].get("error").is_none());
    assert_eq!(server.phase(), Phase::Terminated);
}

#[test]
fn test_malformed_messages_are_skipped() {
    let mut input = b"Bogus header\r\nContent-Length: 2\r\n\r\n{}".to_vec();
    write_message(&mut input, b"{not json").unwrap();
    input.extend(frame(&[request(9, "shutdown", Value::Null)]));

    let mut server = Server::new(ServerConfig::default()).unwrap();
    let mut output = Vec::new();
    server.serve(Cursor::new(input), &mut output).unwrap();

    let body = read_message(&mut Cursor::new(output)).unwrap().unwrap();
    let response: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(response["id"], 9);
    assert_eq!(server.phase(), Phase::ShuttingDown);
}

#[test]
fn test_truncated_body_is_fatal() {
    let mut server = Server::new(ServerConfig::default()).unwrap();
    let mut output = Vec::new();
    let input = b"Content-Length: 100\r\n\r\n{\"jsonrpc\":\"2.0\"}".to_vec();
    assert!(server.serve(Cursor::new(input), &mut output).is_err());
    assert!(output.is_empty());
}

#[test]
fn test_unreadable_length_ends_the_session() {
    let initialize = request(1, "initialize", json!({"capabilities": {}})).to_string();
    let mut input = format!("Content-Length: abc\r\n\r\n{initialize}").into_bytes();
    input.extend(frame(&[
        request(2, "initialize", json!({"capabilities": {}})),
        request(3, "shutdown", Value::Null),
    ]));

    let mut server = Server::new(ServerConfig::default()).unwrap();
    let mut output = Vec::new();
    let result = server.serve(Cursor::new(input), &mut output);

    assert!(matches!(
        result,
        Err(ServerError::Framing(FramingError::InvalidContentLength(ref value))) if value == "abc"
    ));
    assert!(output.is_empty());
    assert_eq!(server.phase(), Phase::Running);
}
