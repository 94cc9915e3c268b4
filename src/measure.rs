use unicode_width::UnicodeWidthStr;

/// Text metrics used to size zone boxes.
pub struct TextMetrics {
    pub char_width: f64,
    pub line_height: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub min_node_width: f64,
    pub min_node_height: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 20.0,
            padding_x: 16.0,
            padding_y: 10.0,
            min_node_width: 140.0,
            min_node_height: 64.0,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    /// Box size for a zone: a title line plus a caption line.
    pub fn node_size(&self, label: &str, caption: &str) -> (f64, f64) {
        let content_width = self.text_width(label).max(self.text_width(caption));
        let width = (content_width + self.padding_x * 2.0).max(self.min_node_width);

        let lines = if caption.is_empty() { 1.0 } else { 2.0 };
        let height = (lines * self.line_height + self.padding_y * 2.0).max(self.min_node_height);

        (width, height)
    }
}
