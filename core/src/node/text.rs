use serde_json::{Map, Value};

use super::base::tag;
use crate::asset::AssetHandle;
use crate::json::{InfoWriter, json_enum, read_f64, read_opt_string, read_string};

json_enum! {
    pub enum FontWeight {
        Normal => "normal",
        Bold => "bold",
    }
    default Normal;
}

json_enum! {
    pub enum FontStyle {
        Normal => "normal",
        Italic => "italic",
    }
    default Normal;
}

json_enum! {
    pub enum TextAlign {
        Left => "left",
        Center => "center",
        Right => "right",
    }
    default Left;
}

pub const DEFAULT_FONT: &str = "Arial";
pub const DEFAULT_FONT_SIZE: f64 = 32.0;
pub const DEFAULT_FILL: &str = "#000000";

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub fill: String,
    pub stroke: Option<String>,
    pub stroke_thickness: f64,
    pub align: TextAlign,
    pub background_color: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT.to_owned(),
            font_size: DEFAULT_FONT_SIZE,
            font_weight: FontWeight::default(),
            font_style: FontStyle::default(),
            fill: DEFAULT_FILL.to_owned(),
            stroke: None,
            stroke_thickness: 0.0,
            align: TextAlign::default(),
            background_color: None,
        }
    }
}

/// System-font text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextData {
    pub text: String,
    pub style: TextStyle,
}

impl TextData {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    pub(crate) fn read_info(&mut self, info: &Map<String, Value>) {
        self.text = read_string(info, "text", "");
        let style = &mut self.style;
        style.font = read_string(info, "style.font", DEFAULT_FONT);
        style.font_size = read_f64(info, "style.fontSize", DEFAULT_FONT_SIZE);
        style.font_weight = FontWeight::read(info, "style.fontWeight");
        style.font_style = FontStyle::read(info, "style.fontStyle");
        style.fill = read_string(info, "style.fill", DEFAULT_FILL);
        style.stroke = read_opt_string(info, "style.stroke");
        style.stroke_thickness = read_f64(info, "style.strokeThickness", 0.0);
        style.align = TextAlign::read(info, "style.align");
        style.background_color = read_opt_string(info, "style.backgroundColor");
    }

    pub(crate) fn write_info(&self, w: &mut InfoWriter<'_>) {
        w.put_prop(tag::TEXT, "text", self.text.as_str(), "");

        let style = &self.style;
        w.put_prop(tag::STYLE, "style.font", style.font.as_str(), DEFAULT_FONT);
        w.put_prop(tag::STYLE, "style.fontSize", style.font_size, DEFAULT_FONT_SIZE);
        w.put_prop(
            tag::STYLE,
            "style.fontWeight",
            style.font_weight.as_str(),
            FontWeight::default().as_str(),
        );
        w.put_prop(
            tag::STYLE,
            "style.fontStyle",
            style.font_style.as_str(),
            FontStyle::default().as_str(),
        );
        w.put_prop(tag::STYLE, "style.fill", style.fill.as_str(), DEFAULT_FILL);
        w.put_opt(tag::STYLE, "style.stroke", style.stroke.as_deref());
        w.put_prop(tag::STYLE, "style.strokeThickness", style.stroke_thickness, 0.0);
        w.put_prop(
            tag::STYLE,
            "style.align",
            style.align.as_str(),
            TextAlign::default().as_str(),
        );
        w.put_opt(tag::STYLE, "style.backgroundColor", style.background_color.as_deref());
    }
}

pub const DEFAULT_BITMAP_TEXT: &str = "BitmapText";
pub const DEFAULT_BITMAP_SIZE: f64 = 32.0;

/// Text drawn with a bitmap-font asset.
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapTextData {
    pub font: AssetHandle,
    pub text: String,
    pub size: f64,
}

impl BitmapTextData {
    pub fn new(font: AssetHandle) -> Self {
        Self {
            font,
            text: DEFAULT_BITMAP_TEXT.to_owned(),
            size: DEFAULT_BITMAP_SIZE,
        }
    }

    pub(crate) fn read_info(&mut self, info: &Map<String, Value>) {
        self.text = read_string(info, "text", "");
        self.size = read_f64(info, "size", DEFAULT_BITMAP_SIZE);
    }

    pub(crate) fn write_info(&self, w: &mut InfoWriter<'_>) {
        w.put_prop(tag::TEXT, "text", self.text.as_str(), "");
        w.put_prop(tag::SIZE, "size", self.size, DEFAULT_BITMAP_SIZE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ObjectBase;
    use serde_json::json;

    #[test]
    fn style_round_trip() {
        let mut text = TextData::new("Score");
        text.style.font_weight = FontWeight::Bold;
        text.style.align = TextAlign::Center;
        text.style.stroke = Some("#ffffff".into());

        let base = ObjectBase::new("text");
        let mut info = Map::new();
        text.write_info(&mut InfoWriter::new(&mut info, &base, true));
        assert_eq!(info["style.fontWeight"], json!("bold"));
        assert!(info.get("style.font").is_none());

        let mut read = TextData::default();
        read.read_info(&info);
        assert_eq!(read, text);
    }

    #[test]
    fn unknown_alignment_falls_back() {
        let mut text = TextData::default();
        text.read_info(json!({"style.align": "justify"}).as_object().unwrap());
        assert_eq!(text.style.align, TextAlign::Left);
        assert_eq!(text.style.font, "Arial");
    }
}
