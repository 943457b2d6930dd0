//! Style inheritance closure
//!
//! Expands the directly-used style sets to include every ancestor reachable
//! through BasedOn links, and through NextStyle links for paragraph styles.
//! Runs as a fixpoint loop with a hard pass cap so that a document carrying
//! a malformed BasedOn cycle still exports instead of hanging.

use idsnip_idml::ids::is_no_reference;
use idsnip_idml::{StyleCatalog, StyleKind};

use crate::DependencySet;

/// Upper bound on closure passes; cycles terminate here
pub const MAX_RESOLVE_PASSES: usize = 50;

/// Expand the style buckets of `deps` over inheritance links, in place
///
/// Must run before color extraction from styles: colors are only
/// discoverable on styles that survive the closure, including styles pulled
/// in solely as BasedOn ancestors.
pub fn resolve_inheritance(deps: &mut DependencySet, catalog: &StyleCatalog) {
    for pass in 0..MAX_RESOLVE_PASSES {
        let mut found_new = false;

        for kind in [StyleKind::Character, StyleKind::Paragraph, StyleKind::Object] {
            let current: Vec<String> = deps.styles(kind).iter().cloned().collect();
            for id in current {
                let Some(def) = catalog.find(kind, &id) else {
                    continue;
                };
                if let Some(base) = &def.based_on {
                    if !is_no_reference(base) && deps.styles_mut(kind).insert(base.clone()) {
                        found_new = true;
                    }
                }
                if kind == StyleKind::Paragraph {
                    if let Some(next) = &def.next_style {
                        if !is_no_reference(next) && deps.styles_mut(kind).insert(next.clone()) {
                            found_new = true;
                        }
                    }
                }
            }
        }

        if !found_new {
            log::debug!("style inheritance closure converged after {} passes", pass + 1);
            return;
        }
    }

    log::warn!(
        "style inheritance closure capped at {MAX_RESOLVE_PASSES} passes; \
         a BasedOn/NextStyle cycle is likely"
    );
}
