//! User-supplied geometry and its resolution against a concrete page.
//!
//! Areas and column positions are parsed once into their raw form
//! ([`AreaSpec`], [`ColumnSpec`]) and stay that way inside the plan. They are
//! resolved to page points only inside the per-page loop, because the pages
//! of one document may differ in size.

use crate::error::ConfigError;
use crate::geometry::Rectangle;
use crate::page::Page;

/// How the numbers of an area or column list are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateMode {
    /// Page-space points.
    #[default]
    Absolute,
    /// Percentages (0-100) of the page's width or height.
    Relative,
}

impl CoordinateMode {
    /// Split off a leading `%` marker.
    fn split(input: &str) -> (CoordinateMode, &str) {
        match input.strip_prefix('%') {
            Some(rest) => (CoordinateMode::Relative, rest),
            None => (CoordinateMode::Absolute, input),
        }
    }
}

/// An area as written by the user, not yet resolved against a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaSpec {
    pub mode: CoordinateMode,
    pub rect: Rectangle,
}

impl AreaSpec {
    /// Parse `[%]top,left,bottom,right`.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let (mode, list) = CoordinateMode::split(input);
        let values = parse_number_list(list)?;
        if values.len() != 4 {
            return Err(ConfigError::AreaComponentCount {
                input: input.to_string(),
                count: values.len(),
            });
        }
        Ok(AreaSpec {
            mode,
            rect: Rectangle::from_edges(values[0], values[1], values[2], values[3]),
        })
    }

    /// Resolve to page points for `page`.
    pub fn resolve(&self, page: &Page) -> Rectangle {
        resolve_rect(self.mode, &self.rect, page.width(), page.height())
    }
}

/// Column boundary x-positions as written by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub mode: CoordinateMode,
    pub positions: Vec<f64>,
}

impl ColumnSpec {
    /// Parse `[%]x1,x2,...`. Any non-zero count is accepted.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let (mode, list) = CoordinateMode::split(input);
        let positions = parse_number_list(list)?;
        Ok(ColumnSpec { mode, positions })
    }

    /// Resolve to page-space x-positions for `page`.
    pub fn resolve(&self, page: &Page) -> Vec<f64> {
        self.positions
            .iter()
            .map(|&x| resolve_x(self.mode, x, page.width()))
            .collect()
    }
}

/// Resolve a rectangle given the page's dimensions.
///
/// `top` and `height` scale against the page height, `left` and `width`
/// against the page width. Nothing is clamped: percentages outside 0-100
/// produce geometry outside the page.
pub fn resolve_rect(
    mode: CoordinateMode,
    rect: &Rectangle,
    page_width: f64,
    page_height: f64,
) -> Rectangle {
    match mode {
        CoordinateMode::Absolute => *rect,
        CoordinateMode::Relative => Rectangle::new(
            rect.top / 100.0 * page_height,
            rect.left / 100.0 * page_width,
            rect.width / 100.0 * page_width,
            rect.height / 100.0 * page_height,
        ),
    }
}

/// One-dimensional form of [`resolve_rect`] for x-positions.
pub fn resolve_x(mode: CoordinateMode, x: f64, page_width: f64) -> f64 {
    match mode {
        CoordinateMode::Absolute => x,
        CoordinateMode::Relative => x / 100.0 * page_width,
    }
}

/// Parse a comma-separated list of floating point numbers.
///
/// Whitespace around tokens is ignored. The error names the full list and
/// the first offending token.
pub fn parse_number_list(input: &str) -> Result<Vec<f64>, ConfigError> {
    input
        .split(',')
        .map(|token| {
            token
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidNumberList {
                    input: input.to_string(),
                    token: token.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(width: f64, height: f64) -> Page {
        Page::new(1, width, height, Vec::new(), Vec::new())
    }

    #[test]
    fn number_list_valid() {
        assert_eq!(parse_number_list("1.0,2.5,3.3").unwrap(), vec![1.0, 2.5, 3.3]);
    }

    #[test]
    fn number_list_invalid_names_list_and_token() {
        let err = parse_number_list("1.0,abc,3.8").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumberList {
                input: "1.0,abc,3.8".to_string(),
                token: "abc".to_string(),
            }
        );
    }

    #[test]
    fn number_list_empty_token_is_error() {
        assert!(parse_number_list("1,,2").is_err());
        assert!(parse_number_list("").is_err());
    }

    #[test]
    fn area_absolute_parses_edges() {
        let spec = AreaSpec::parse("0,0,451,212").unwrap();
        assert_eq!(spec.mode, CoordinateMode::Absolute);
        assert_eq!(spec.rect, Rectangle::new(0.0, 0.0, 212.0, 451.0));
    }

    #[test]
    fn area_relative_strips_marker() {
        let spec = AreaSpec::parse("%0,0,100,50").unwrap();
        assert_eq!(spec.mode, CoordinateMode::Relative);
        assert_eq!(spec.rect, Rectangle::new(0.0, 0.0, 50.0, 100.0));
    }

    #[test]
    fn area_wrong_component_count() {
        for input in ["1,2,3", "1,2,3,4,5", "%1,2,3", "%1,2,3,4,5"] {
            assert!(
                matches!(
                    AreaSpec::parse(input),
                    Err(ConfigError::AreaComponentCount { .. })
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn area_bad_number() {
        assert!(matches!(
            AreaSpec::parse("%1,x,3,4"),
            Err(ConfigError::InvalidNumberList { .. })
        ));
    }

    #[test]
    fn relative_area_resolves_against_page() {
        let spec = AreaSpec::parse("%0,0,100,50").unwrap();
        let resolved = spec.resolve(&page(612.0, 792.0));
        assert_eq!(resolved, Rectangle::new(0.0, 0.0, 306.0, 792.0));
    }

    #[test]
    fn relative_area_depends_on_each_page() {
        let spec = AreaSpec::parse("%10,10,20,20").unwrap();
        let a = spec.resolve(&page(100.0, 200.0));
        let b = spec.resolve(&page(300.0, 400.0));
        assert_eq!(a, Rectangle::new(20.0, 10.0, 10.0, 20.0));
        assert_eq!(b, Rectangle::new(40.0, 30.0, 30.0, 40.0));
    }

    #[test]
    fn absolute_area_ignores_page_size() {
        let spec = AreaSpec::parse("0,0,451,212").unwrap();
        let expected = Rectangle::new(0.0, 0.0, 212.0, 451.0);
        assert_eq!(spec.resolve(&page(612.0, 792.0)), expected);
        assert_eq!(spec.resolve(&page(10.0, 10.0)), expected);
    }

    #[test]
    fn relative_values_are_not_clamped() {
        let spec = AreaSpec::parse("%-10,0,150,200").unwrap();
        let resolved = spec.resolve(&page(100.0, 100.0));
        assert_eq!(resolved.top, -10.0);
        assert_eq!(resolved.height, 160.0);
        assert_eq!(resolved.width, 200.0);
    }

    #[test]
    fn inverted_area_passes_through() {
        let spec = AreaSpec::parse("100,100,50,20").unwrap();
        assert_eq!(spec.rect.width, -80.0);
        assert_eq!(spec.rect.height, -50.0);
        assert_eq!(spec.resolve(&page(612.0, 792.0)), spec.rect);
    }

    #[test]
    fn columns_absolute_and_relative() {
        let abs = ColumnSpec::parse("59,218,331,551").unwrap();
        assert_eq!(abs.resolve(&page(612.0, 792.0)), vec![59.0, 218.0, 331.0, 551.0]);

        let rel = ColumnSpec::parse("%25,50").unwrap();
        assert_eq!(rel.mode, CoordinateMode::Relative);
        assert_eq!(rel.resolve(&page(200.0, 792.0)), vec![50.0, 100.0]);
    }

    #[test]
    fn single_column_accepted() {
        assert_eq!(ColumnSpec::parse("10").unwrap().positions, vec![10.0]);
    }
}
