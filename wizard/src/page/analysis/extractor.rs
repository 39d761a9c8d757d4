use crate::page::{
    analysis::scanner::{has_rendered_text, is_visible_color},
    document::Page,
};

/// Style read off one element during one pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleSample {
    pub element_tag: String,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub border_color: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub font_weight: Option<String>,
}

impl StyleSample {
    /// Present colors in background, text, border order.
    pub fn colors(&self) -> impl Iterator<Item = &str> {
        [&self.background_color, &self.text_color, &self.border_color]
            .into_iter()
            .filter_map(|color| color.as_deref())
    }
}

/// Read the style of a single element. Pure: no visibility filtering here.
pub fn extract<P: Page>(page: &P, node: &P::Node) -> StyleSample {
    let mut sample = StyleSample {
        element_tag: page.tag_name(node).to_lowercase(),
        ..Default::default()
    };
    let Some(style) = page.computed_style(node) else {
        return sample;
    };

    let visible = |value: String| is_visible_color(&value).then_some(value);
    sample.background_color = visible(style.background_color);
    sample.text_color = visible(style.color);
    sample.border_color = visible(style.border_color);

    if has_rendered_text(&page.text_content(node)) {
        sample.font_family = Some(style.font_family).filter(|family| !family.is_empty());
        sample.font_size = Some(style.font_size);
        sample.font_weight = Some(style.font_weight);
    }

    sample
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{document::ComputedStyle, memory::StaticPage};

    #[test]
    fn extracts_visible_colors_and_text_fonts() {
        let mut page = StaticPage::new("about:blank", "");
        let root = page.root();
        let body = page.append_element(root, "BODY", ComputedStyle::default());
        let style = ComputedStyle::default()
            .with_background("rgba(0, 0, 0, 0)")
            .with_color("rgb(1, 2, 3)")
            .with_border("transparent")
            .with_font("Georgia, serif", "16px", "400");
        let p = page.append_element(body, "P", style.clone());
        page.append_text(p, "copy");
        let empty = page.append_element(body, "div", style);
        page.append_text(empty, "  \n ");

        let sample = extract(&page, &p);
        assert_eq!(sample.element_tag, "p");
        assert_eq!(sample.background_color, None);
        assert_eq!(sample.text_color.as_deref(), Some("rgb(1, 2, 3)"));
        assert_eq!(sample.border_color, None);
        assert_eq!(sample.font_family.as_deref(), Some("Georgia, serif"));
        assert_eq!(
            sample.colors().collect::<Vec<_>>(),
            vec!["rgb(1, 2, 3)"]
        );

        let sample = extract(&page, &empty);
        assert_eq!(sample.text_color.as_deref(), Some("rgb(1, 2, 3)"));
        assert_eq!(sample.font_family, None);
        assert_eq!(sample.font_size, None);
    }

    #[test]
    fn missing_computed_style_yields_empty_sample() {
        let mut page = StaticPage::new("about:blank", "");
        let root = page.root();
        let node = page.append_element(root, "svg", ComputedStyle::default());
        page.set_computed_style(node, None);
        page.append_text(node, "label");

        let sample = extract(&page, &node);
        assert_eq!(
            sample,
            StyleSample {
                element_tag: "svg".into(),
                ..Default::default()
            }
        );
    }
}
