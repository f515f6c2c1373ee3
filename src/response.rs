use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Message {
    msg: String,
}

impl Message {
    pub fn new(msg: impl Into<String>) -> Self {
        Message { msg: msg.into() }
    }
}
