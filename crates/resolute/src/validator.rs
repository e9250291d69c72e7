//! Live validation of a selector immediately before an interaction.
//!
//! Page state can change between grounding and acting, so validation always
//! probes the page again. Checks run in a fixed order and each failure has
//! its own error: match count, then visibility, then enablement.

use crate::candidate::Selector;
use crate::page::{ElementState, Page};
use crate::result::{ResoluteError, ResoluteResult};

/// Validate that `selector` matches exactly one visible, enabled element.
///
/// # Errors
///
/// - `ElementNotFound` for zero matches
/// - `AmbiguousSelector` for more than one match
/// - `NotVisible` if the single match is hidden
/// - `NotEnabled` if it is disabled
pub fn validate<P: Page + ?Sized>(page: &P, selector: &Selector) -> ResoluteResult<ElementState> {
    let matches = page.probe(selector)?;
    let state = match matches.as_slice() {
        [] => {
            return Err(ResoluteError::ElementNotFound {
                selector: selector.to_string(),
            })
        }
        [only] => *only,
        many => {
            return Err(ResoluteError::AmbiguousSelector {
                selector: selector.to_string(),
                count: many.len(),
            })
        }
    };

    if !state.visible {
        return Err(ResoluteError::NotVisible {
            selector: selector.to_string(),
        });
    }
    if !state.enabled {
        return Err(ResoluteError::NotEnabled {
            selector: selector.to_string(),
        });
    }
    Ok(state)
}
