//! Compatibility layer for positional call shapes.
//!
//! Older integrations called the URL helpers with loosely-typed positional
//! arguments: `(path)`, `(path, params)`, `(source, path)` or
//! `(source, path, params)`, and for srcsets additionally
//! `(source, path, params, bounds)`. This module maps those shapes onto
//! [`ImageRequest`] and forwards to [`ImageUrls`]. It adds no behavior of
//! its own; new code should build an [`ImageRequest`] directly.

use crate::assemble::join_srcset;
use crate::client::{ImageRequest, ImageUrls};
use crate::error::{Error, Result};
use crate::types::Params;
use crate::widths::{BaseDimensions, WidthBounds};

/// One positional argument of a legacy call.
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyArg {
    Str(String),
    Params(Params),
    Bounds(WidthBounds),
}

impl From<&str> for LegacyArg {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for LegacyArg {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Params> for LegacyArg {
    fn from(value: Params) -> Self {
        Self::Params(value)
    }
}

impl From<WidthBounds> for LegacyArg {
    fn from(value: WidthBounds) -> Self {
        Self::Bounds(value)
    }
}

fn shape_error() -> Error {
    Error::InvalidArgument("path and source must be strings; params must be a map".into())
}

fn path_missing() -> Error {
    Error::InvalidArgument("path missing".into())
}

/// Map the shared 1–3 argument shapes onto a request.
fn request_from(args: &[LegacyArg]) -> Result<ImageRequest> {
    use LegacyArg::{Params as P, Str as S};

    let (source, path, params) = match args {
        [S(path)] => (None, path, Params::new()),
        [S(path), P(params)] => (None, path, params.clone()),
        [S(source), S(path)] => (Some(source), path, Params::new()),
        [S(source), S(path), P(params)] => (Some(source), path, params.clone()),
        [] => return Err(path_missing()),
        [_] | [_, _] | [_, _, _] => return Err(shape_error()),
        _ => return Err(path_missing()),
    };
    Ok(ImageRequest {
        path: path.clone(),
        source: source.cloned(),
        params,
        disable_path_encoding: false,
    })
}

/// Single URL from a legacy argument list.
pub fn image_url(urls: &ImageUrls, args: &[LegacyArg]) -> Result<String> {
    urls.build_url(&request_from(args)?)
}

/// Width srcset string from a legacy argument list.
///
/// A `w`/`h` pair in the params fixes the rendered size, as the old helpers
/// did; a trailing [`LegacyArg::Bounds`] carries min/max/explicit widths.
pub fn image_srcset(urls: &ImageUrls, args: &[LegacyArg]) -> Result<String> {
    let (args, bounds) = match args {
        [rest @ .., LegacyArg::Bounds(bounds)] if rest.len() == 3 => (rest, bounds.clone()),
        [.., LegacyArg::Bounds(_)] => return Err(shape_error()),
        _ if args.len() > 3 => return Err(path_missing()),
        _ => (args, WidthBounds::default()),
    };
    let request = request_from(args)?;
    let base = BaseDimensions::from_params(&request.params);
    let variants = urls.build_width_srcset(&request, &bounds, &base)?;
    Ok(join_srcset(&variants))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn urls() -> ImageUrls {
        ImageUrls::new(bare_source("a.com")).unwrap()
    }

    fn multi_urls() -> ImageUrls {
        ImageUrls::new(multi_source(&["a.com", "b.com"])).unwrap()
    }

    fn w(value: &str) -> Params {
        Params::from([("w".to_string(), value.to_string())])
    }

    #[test]
    fn path_only() {
        assert_eq!(image_url(&urls(), &["x.jpg".into()]).unwrap(), "https://a.com/x.jpg");
    }

    #[test]
    fn path_and_params() {
        let url = image_url(&urls(), &["x.jpg".into(), w("100").into()]).unwrap();
        assert_eq!(url, "https://a.com/x.jpg?w=100");
    }

    #[test]
    fn source_and_path() {
        let url = image_url(&multi_urls(), &["b.com".into(), "x.jpg".into()]).unwrap();
        assert_eq!(url, "https://b.com/x.jpg");
    }

    #[test]
    fn source_path_and_params() {
        let url = image_url(&multi_urls(), &["b.com".into(), "x.jpg".into(), w("5").into()]).unwrap();
        assert_eq!(url, "https://b.com/x.jpg?w=5");
    }

    #[test]
    fn params_first_is_shape_error() {
        let err = image_url(&urls(), &[w("1").into(), "x.jpg".into()]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(ref m) if m.contains("must be strings")));
    }

    #[test]
    fn no_args_is_path_missing() {
        let err = image_url(&urls(), &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(ref m) if m == "path missing"));
    }

    #[test]
    fn too_many_args_is_invalid_argument() {
        let args: Vec<LegacyArg> = vec!["a".into(), "b".into(), w("1").into(), "c".into()];
        assert!(matches!(image_url(&urls(), &args), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn srcset_with_bounds() {
        let args: Vec<LegacyArg> = vec![
            "a.com".into(),
            "x.jpg".into(),
            Params::new().into(),
            WidthBounds::between(100, 116).into(),
        ];
        assert_eq!(
            image_srcset(&urls(), &args).unwrap(),
            "https://a.com/x.jpg?w=100 100w, https://a.com/x.jpg?w=116 116w"
        );
    }

    #[test]
    fn srcset_bounds_in_wrong_position_is_shape_error() {
        let args: Vec<LegacyArg> = vec!["x.jpg".into(), WidthBounds::default().into()];
        assert!(matches!(image_srcset(&urls(), &args), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn srcset_fixed_width_from_params() {
        let args: Vec<LegacyArg> = vec![
            "x.jpg".into(),
            Params::from([
                ("w".to_string(), "100".to_string()),
                ("h".to_string(), "50".to_string()),
            ])
            .into(),
        ];
        let srcset = image_srcset(&urls(), &args).unwrap();
        assert!(srcset.contains("h=50&w=100 100w"));
        assert!(srcset.contains("h=100&w=200 200w"));
        assert!(srcset.contains("h=150&w=300 300w"));
    }
}
