//! Mock JSON-RPC node served by axum on an ephemeral port

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const ACCOUNT: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
pub const BLOCK_HASH: &str = "0x00000000000000000000000000000000000000000000000000000000000000bb";

/// Address the tests deploy the font contract at
pub fn contract_hex() -> String {
    format!("0x{}", "fc".repeat(20))
}

pub fn tx_hash(n: usize) -> String {
    format!("0x{:064x}", n)
}

#[derive(Default)]
pub struct MockNode {
    pub calls: Mutex<Vec<(String, Value)>>,
    pub sent: AtomicUsize,
    /// receipt polls answered with null before the receipt shows up
    pub pending_polls: AtomicUsize,
    /// transaction number (1-based) whose receipt reports a revert
    pub revert_tx: Option<usize>,
    /// transaction number (1-based) rejected by eth_sendTransaction
    pub reject_tx: Option<usize>,
}

impl MockNode {
    pub fn methods(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(method, _)| method.clone())
            .collect()
    }

    pub fn count(&self, method: &str) -> usize {
        self.methods().iter().filter(|m| *m == method).count()
    }

    pub fn sent_txs(&self) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(method, _)| method == "eth_sendTransaction")
            .map(|(_, params)| params[0].clone())
            .collect()
    }

    pub fn sent_data(&self) -> Vec<Vec<u8>> {
        self.sent_txs()
            .iter()
            .map(|tx| {
                let data = tx["data"].as_str().unwrap();
                hex::decode(data.trim_start_matches("0x")).unwrap()
            })
            .collect()
    }
}

fn tx_number(params: &Value) -> usize {
    let hash = params[0].as_str().unwrap_or_default();
    usize::from_str_radix(hash.trim_start_matches("0x"), 16).unwrap_or(0)
}

fn transaction(n: usize) -> Value {
    json!({
        "hash": tx_hash(n),
        "nonce": format!("0x{:x}", n.saturating_sub(1)),
        "blockHash": BLOCK_HASH,
        "blockNumber": format!("0x{:x}", 100 + n),
        "transactionIndex": "0x0",
        "from": ACCOUNT,
        "to": contract_hex(),
        "value": "0x0",
        "gasPrice": "0x3b9aca00",
        "gas": "0x1c9c380",
        "input": "0x",
        "v": "0x1b",
        "r": "0x1",
        "s": "0x1",
        "type": "0x0",
        "chainId": "0x7a69"
    })
}

fn receipt(n: usize, status: &str) -> Value {
    json!({
        "transactionHash": tx_hash(n),
        "transactionIndex": "0x0",
        "blockHash": BLOCK_HASH,
        "blockNumber": format!("0x{:x}", 100 + n),
        "from": ACCOUNT,
        "to": contract_hex(),
        "cumulativeGasUsed": "0x5208",
        "gasUsed": "0x5208",
        "contractAddress": null,
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "status": status,
        "type": "0x0",
        "effectiveGasPrice": "0x3b9aca00"
    })
}

fn rpc_error(id: Value, code: i64, message: &str) -> Json<Value> {
    Json(json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {"code": code, "message": message}
    }))
}

async fn handle(State(node): State<Arc<MockNode>>, Json(req): Json<Value>) -> Json<Value> {
    let method = req["method"].as_str().unwrap_or_default().to_string();
    let params = req["params"].clone();
    let id = req["id"].clone();
    node.calls
        .lock()
        .unwrap()
        .push((method.clone(), params.clone()));

    let result = match method.as_str() {
        "eth_accounts" => json!([ACCOUNT]),
        "eth_getBalance" => json!("0xde0b6b3a7640000"),
        "eth_chainId" => json!("0x7a69"),
        "eth_blockNumber" => json!(format!("0x{:x}", 100 + node.sent.load(Ordering::SeqCst))),
        "eth_gasPrice" => json!("0x3b9aca00"),
        "eth_estimateGas" => json!("0x1c9c380"),
        "eth_sendTransaction" => {
            let n = node.sent.fetch_add(1, Ordering::SeqCst) + 1;
            if node.reject_tx == Some(n) {
                return rpc_error(id, -32000, "execution reverted: Font is finalized");
            }
            json!(tx_hash(n))
        }
        "eth_getTransactionByHash" => transaction(tx_number(&params)),
        "eth_getTransactionReceipt" => {
            let pending = node.pending_polls.load(Ordering::SeqCst);
            if pending > 0 {
                node.pending_polls.store(pending - 1, Ordering::SeqCst);
                Value::Null
            } else {
                let n = tx_number(&params);
                let status = if node.revert_tx == Some(n) { "0x0" } else { "0x1" };
                receipt(n, status)
            }
        }
        _ => return rpc_error(id, -32601, "method not found"),
    };
    Json(json!({"jsonrpc": "2.0", "id": id, "result": result}))
}

/// Serve `node` and return its URL
pub async fn spawn_node(node: Arc<MockNode>) -> String {
    let app = Router::new().route("/", post(handle)).with_state(node);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
