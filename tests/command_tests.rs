//! Command server integration tests
//!
//! Drives the JSON-RPC server with in-memory streams and checks responses
//! line by line.

use std::io::Cursor;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use lonet_switch::commands::register_all_commands;
use lonet_switch::{CommandServer, Mode, ServerInfo, StoreConfig, SwitchStore, Switchboard};

fn in_memory_board() -> Arc<Switchboard> {
    Arc::new(Switchboard::with_store(SwitchStore::open_in_memory().unwrap()))
}

/// Feed `requests` to a fresh server and return every response line
fn exchange(board: Arc<Switchboard>, requests: &[Value]) -> Vec<Value> {
    let input: String = requests.iter().map(|r| format!("{}\n", r)).collect();

    let mut server = CommandServer::with_io(ServerInfo::default(), Cursor::new(input), Vec::new());
    register_all_commands(&mut server, board);
    server.run().unwrap();

    let output = String::from_utf8(server.into_writer()).unwrap();
    output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "commands/call",
        "params": { "name": name, "arguments": arguments }
    })
}

#[test]
fn test_initialize_and_ping() {
    let responses = exchange(
        in_memory_board(),
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}),
        ],
    );

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "lonet-switch");
    assert_eq!(responses[1]["id"], 2);
    assert_eq!(responses[1]["result"], json!({}));
}

#[test]
fn test_initialize_reports_custom_server_info() {
    let input = format!("{}\n", json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}));
    let info = ServerInfo::new("lonet-tray".to_string(), "2.1.0".to_string());

    let mut server = CommandServer::with_io(info, Cursor::new(input), Vec::new());
    server.run().unwrap();

    let output = String::from_utf8(server.into_writer()).unwrap();
    let response: Value = serde_json::from_str(output.trim()).unwrap();
    assert_eq!(response["result"]["serverInfo"]["name"], "lonet-tray");
    assert_eq!(response["result"]["serverInfo"]["version"], "2.1.0");
}

#[test]
fn test_commands_list_names_every_command() {
    let responses = exchange(
        in_memory_board(),
        &[json!({"jsonrpc": "2.0", "id": 1, "method": "commands/list"})],
    );

    let mut names: Vec<String> = responses[0]["result"]["commands"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();

    assert_eq!(
        names,
        vec![
            "add_template",
            "clear_group",
            "compact",
            "get_status",
            "history",
            "list_groups",
            "list_templates",
            "remove_template",
            "switch",
        ]
    );
    assert!(responses[0]["result"]["commands"][0]["inputSchema"].is_object());
}

#[test]
fn test_switch_then_status() {
    let board = in_memory_board();
    let responses = exchange(
        board.clone(),
        &[
            call(1, "switch", json!({"mode": "net", "group": "*", "locale": "en-US"})),
            call(2, "get_status", json!({"group": "lab1"})),
            call(3, "list_groups", json!({})),
        ],
    );

    assert_eq!(
        responses[0]["result"]["content"][0]["text"],
        "Switched to net (group: *, locale: en-US)"
    );
    assert_eq!(responses[0]["result"]["data"]["change"]["mode"], "net");

    assert_eq!(
        responses[1]["result"]["content"][0]["text"],
        "Current state for group 'lab1': net (locale: en-US)"
    );
    assert_eq!(
        responses[1]["result"]["data"],
        json!({"group": "lab1", "mode": "net", "locale": "en-US"})
    );

    assert_eq!(responses[2]["result"]["data"][0]["group"], "*");
    assert_eq!(board.status("other").unwrap().mode, Mode::Network);
}

#[test]
fn test_history_compact_and_clear_group() {
    let board = in_memory_board();
    board.switch(Mode::Network, "lab1", "").unwrap();
    board.switch(Mode::Local, "lab1", "").unwrap();
    board.switch(Mode::Network, "lab2", "").unwrap();

    let responses = exchange(
        board.clone(),
        &[
            call(1, "history", json!({"group": "lab1"})),
            call(2, "compact", json!({})),
            call(3, "clear_group", json!({"group": "lab2"})),
            call(4, "history", json!({})),
        ],
    );

    assert_eq!(responses[0]["result"]["data"].as_array().unwrap().len(), 2);
    assert_eq!(responses[1]["result"]["data"]["eventsBefore"], 3);
    assert_eq!(responses[1]["result"]["data"]["eventsAfter"], 2);
    assert_eq!(responses[2]["result"]["data"]["deleted"], 1);
    assert_eq!(
        responses[2]["result"]["content"][0]["text"],
        "All switch state changes for group 'lab2' have been deleted."
    );

    let remaining = responses[3]["result"]["data"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["group"], "lab1");
    assert_eq!(remaining[0]["mode"], "lo");
}

#[test]
fn test_template_commands() {
    let responses = exchange(
        in_memory_board(),
        &[
            call(1, "add_template", json!({"path": "/etc/proxy.conf.jinja", "group": "lab1"})),
            call(2, "add_template", json!({"path": "/etc/proxy.conf.jinja"})),
            call(3, "list_templates", json!({})),
            call(4, "remove_template", json!({"path": "/etc/proxy.conf.jinja"})),
            call(5, "remove_template", json!({"path": "/etc/proxy.conf.jinja"})),
        ],
    );

    assert_eq!(responses[0]["result"]["data"]["status"], "added");
    assert_eq!(responses[0]["result"]["data"]["template"]["group"], "lab1");
    assert_eq!(responses[1]["result"]["data"]["status"], "already_present");
    assert_eq!(responses[2]["result"]["data"].as_array().unwrap().len(), 1);
    assert_eq!(
        responses[3]["result"]["content"][0]["text"],
        "Deleted /etc/proxy.conf.jinja"
    );
    assert_eq!(responses[4]["result"]["data"]["removed"], false);
}

#[test]
fn test_error_responses() {
    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "nope"}),
        call(2, "missing_command", json!({})),
        call(3, "switch", json!({"mode": "wifi"})),
        call(4, "switch", json!({"group": "lab1"})),
        call(5, "add_template", json!({"path": "/etc/plain.conf"})),
        json!({"jsonrpc": "1.0", "id": 6, "method": "ping"}),
    ];
    let responses = exchange(in_memory_board(), &input);

    assert_eq!(responses[0]["error"]["code"], -32601);
    assert_eq!(responses[1]["error"]["code"], -32602);
    assert_eq!(responses[1]["error"]["data"]["command"], "missing_command");
    assert_eq!(responses[2]["error"]["code"], -32603);
    assert!(responses[2]["error"]["data"]["details"]
        .as_str()
        .unwrap()
        .contains("invalid mode 'wifi'"));
    assert_eq!(responses[3]["error"]["code"], -32603);
    assert_eq!(responses[4]["error"]["code"], -32603);
    assert_eq!(responses[5]["error"]["code"], -32600);
}

#[test]
fn test_parse_error_keeps_server_running() {
    let board = in_memory_board();
    let input = "this is not json\n{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n";

    let mut server = CommandServer::with_io(ServerInfo::default(), Cursor::new(input), Vec::new());
    register_all_commands(&mut server, board);
    assert_eq!(server.command_count(), 9);
    server.run().unwrap();

    let output = String::from_utf8(server.into_writer()).unwrap();
    let responses: Vec<Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[0]["id"], Value::Null);
    assert_eq!(responses[1]["id"], 1);
}

#[test]
fn test_server_over_file_backed_store() {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig::new(temp_dir.path());

    let board = Arc::new(Switchboard::open(&config).unwrap());
    exchange(board, &[call(1, "switch", json!({"mode": "net", "group": "lab1"}))]);

    let reopened = Switchboard::open(&config).unwrap();
    assert_eq!(reopened.status("lab1").unwrap().mode, Mode::Network);
}
