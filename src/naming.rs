//! Filename conventions that pair a main image with its mask.
//!
//! A pair shares a base name: `garden_main.png` and `garden_mask.png` both
//! reduce to `garden`. Suffixes are fixed and case-sensitive; there is no
//! configurable extension.

/// Suffix marking a main image file.
pub const MAIN_SUFFIX: &str = "_main.png";

/// Suffix marking a mask image file.
pub const MASK_SUFFIX: &str = "_mask.png";

/// Role of a file within a main/mask pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The base image the mask is applied to.
    Main,
    /// The grayscale-interpreted mask image.
    Mask,
}

impl Role {
    /// The fixed filename suffix for this role.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Role::Main => MAIN_SUFFIX,
            Role::Mask => MASK_SUFFIX,
        }
    }

    /// Whether `filename` carries this role's suffix.
    #[must_use]
    pub fn matches(self, filename: &str) -> bool {
        filename.ends_with(self.suffix())
    }
}

/// Strip the role suffix from a filename, yielding the pair's base name.
///
/// A filename without the suffix is returned unchanged, so the function is
/// total over arbitrary strings. Callers that need strict filtering use
/// [`Role::matches`] first; the batch runner does exactly that before any
/// pairing happens.
#[must_use]
pub fn base_name(filename: &str, role: Role) -> &str {
    filename.strip_suffix(role.suffix()).unwrap_or(filename)
}

/// A main file and the mask resolved for it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairMatch {
    /// Base identifier shared by the pair.
    pub key: String,
    /// Filename of the main image.
    pub main: String,
    /// Filename of the matching mask, or `None` when no mask shares the
    /// main file's base name.
    pub mask: Option<String>,
}

/// Pair every main file with the first mask file sharing its base name.
///
/// Results keep the order of `main_files`. Unmatched mains are retained
/// with `mask: None` so they can be reported rather than silently dropped.
/// When several candidates share a base name the first one in listing
/// order wins; there is no ambiguity detection.
#[must_use]
pub fn match_pairs(main_files: &[String], mask_files: &[String]) -> Vec<PairMatch> {
    main_files
        .iter()
        .map(|main| {
            let key = base_name(main, Role::Main);
            let mask = mask_files
                .iter()
                .find(|m| base_name(m, Role::Mask) == key)
                .cloned();
            PairMatch {
                key: key.to_string(),
                main: main.clone(),
                mask,
            }
        })
        .collect()
}
