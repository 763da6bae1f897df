use serde_json::{Map, Value};

use super::base::tag;
use crate::asset::AssetHandle;
use crate::json::{InfoWriter, read_opt_string};

/// A sprite with per-state frames and a click callback.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonData {
    pub asset: AssetHandle,
    pub over_frame: Option<String>,
    pub out_frame: Option<String>,
    pub down_frame: Option<String>,
    pub up_frame: Option<String>,
    pub callback: Option<String>,
    pub callback_context: Option<String>,
}

impl ButtonData {
    pub fn new(asset: AssetHandle) -> Self {
        Self {
            asset,
            over_frame: None,
            out_frame: None,
            down_frame: None,
            up_frame: None,
            callback: None,
            callback_context: None,
        }
    }

    pub(crate) fn read_info(&mut self, info: &Map<String, Value>) {
        self.over_frame = read_frame(info, "overFrame");
        self.out_frame = read_frame(info, "outFrame");
        self.down_frame = read_frame(info, "downFrame");
        self.up_frame = read_frame(info, "upFrame");
        self.callback = read_opt_string(info, "callback");
        self.callback_context = read_opt_string(info, "callbackContext");
    }

    pub(crate) fn write_info(&self, w: &mut InfoWriter<'_>) {
        w.put_opt(tag::FRAMES, "overFrame", self.over_frame.as_deref());
        w.put_opt(tag::FRAMES, "outFrame", self.out_frame.as_deref());
        w.put_opt(tag::FRAMES, "downFrame", self.down_frame.as_deref());
        w.put_opt(tag::FRAMES, "upFrame", self.up_frame.as_deref());
        w.put_opt(tag::CALLBACK, "callback", self.callback.as_deref());
        w.put_opt(tag::CALLBACK, "callbackContext", self.callback_context.as_deref());
    }
}

fn read_frame(info: &Map<String, Value>, key: &str) -> Option<String> {
    match info.get(key)? {
        Value::String(name) => Some(name.clone()),
        Value::Number(index) => Some(index.to_string()),
        _ => None,
    }
}
