//! Small helpers for emitting SVG/HTML markup.

use std::fmt::Write;

use foundation::math::Vec2;

/// Escapes text for use in element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Builder for the `d` attribute of a `<path>`.
#[derive(Debug, Default, Clone)]
pub struct PathData {
    d: String,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Vec2) -> &mut Self {
        let _ = write!(self.d, "M{:.2},{:.2}", p.x, p.y);
        self
    }

    pub fn line_to(&mut self, p: Vec2) -> &mut Self {
        let _ = write!(self.d, "L{:.2},{:.2}", p.x, p.y);
        self
    }

    pub fn arc_to(&mut self, radius: f64, large_arc: bool, p: Vec2) -> &mut Self {
        let _ = write!(
            self.d,
            "A{radius:.2},{radius:.2},0,{},1,{:.2},{:.2}",
            u8::from(large_arc),
            p.x,
            p.y
        );
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.d.push('Z');
        self
    }

    /// Polyline through `points`, optionally closed.
    pub fn polyline<I>(&mut self, points: I, closed: bool) -> &mut Self
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut first = true;
        for p in points {
            if first {
                self.move_to(p);
                first = false;
            } else {
                self.line_to(p);
            }
        }
        if closed && !first {
            self.close();
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }

    pub fn finish(self) -> String {
        self.d
    }
}
