use crate::model::PixelRect;

/// Text fields for typing a ROI in pixel coordinates.
///
/// Every edit strips non-digit characters, so the fields only ever hold
/// unsigned integers or nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualRoiForm {
    x: String,
    y: String,
    width: String,
    height: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    X,
    Y,
    Width,
    Height,
}

fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

impl ManualRoiForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: FormField, text: &str) {
        *self.field_mut(field) = digits_only(text);
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::X => &self.x,
            FormField::Y => &self.y,
            FormField::Width => &self.width,
            FormField::Height => &self.height,
        }
    }

    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::X => &mut self.x,
            FormField::Y => &mut self.y,
            FormField::Width => &mut self.width,
            FormField::Height => &mut self.height,
        }
    }

    pub fn rect(&self) -> Option<PixelRect> {
        let parse = |text: &str| text.parse::<i64>().ok();
        let rect = PixelRect::new(
            parse(&self.x)?,
            parse(&self.y)?,
            parse(&self.width)?,
            parse(&self.height)?,
        );
        rect.has_area().then_some(rect)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
