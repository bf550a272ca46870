//! Conversion of a flat heading sequence into a nested outline.

use non_empty_string::NonEmptyString;

use crate::domain::{Config, Heading, Link, OutlineNode};

/// Builds the sibling list that starts at `start`.
///
/// Every heading at the same level as `headings[start]` becomes a sibling;
/// deeper headings are nested below the most recent sibling. Building stops
/// at the first heading shallower than the starting one, and the index of
/// that heading is returned along with the siblings (or `headings.len()` if
/// the sequence was exhausted).
///
/// Headings without an identifier are given one, derived from their position
/// in `headings` (`toc-<index>` with the default configuration). Existing
/// identifiers are never changed, so building again from the same headings
/// yields the same outline.
///
/// The headings are expected to form a valid hierarchy (see
/// [`is_valid_hierarchy`](crate::is_valid_hierarchy)). Otherwise the outline
/// is still built, but it may not reflect the document.
pub fn build_siblings(
    headings: &mut [Heading],
    start: usize,
    config: &Config,
) -> (Vec<OutlineNode>, usize) {
    let mut siblings: Vec<OutlineNode> = Vec::new();
    let Some(current_level) = headings.get(start).map(|heading| heading.level) else {
        return (siblings, start);
    };

    let mut index = start;
    while index < headings.len() {
        let level = headings[index].level;

        if level == current_level {
            let link = link_for(&mut headings[index], index, config);
            siblings.push(OutlineNode::new(link));
            index += 1;
        } else if level > current_level {
            let (children, next) = build_siblings(headings, index, config);
            // the first iteration always pushes, so a parent exists
            if let Some(parent) = siblings.last_mut() {
                parent.children.extend(children);
            }
            index = next;
        } else {
            break;
        }
    }

    (siblings, index)
}

fn link_for(heading: &mut Heading, index: usize, config: &Config) -> Link {
    let target = heading.ensure_anchor(|| generated_anchor(index, config));
    let label = if heading.text.is_empty() {
        config.generated_label(index)
    } else {
        heading.text.clone()
    };
    Link { target, label }
}

fn generated_anchor(index: usize, config: &Config) -> NonEmptyString {
    NonEmptyString::new(config.generated_id(index))
        .expect("a formatted index is never empty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Level, Outline};

    fn headings(spec: &[(u8, &str)]) -> Vec<Heading> {
        spec.iter()
            .map(|&(level, text)| Heading::new(Level::new(level).unwrap(), text))
            .collect()
    }

    fn build(headings: &mut [Heading]) -> Outline {
        let (roots, next) = build_siblings(headings, 0, &Config::default());
        assert_eq!(next, headings.len());
        Outline::from(roots)
    }

    #[test]
    fn nests_deeper_headings() {
        let mut headings = headings(&[(1, "1"), (2, "1-1"), (3, "1-1-1"), (2, "1-2"), (1, "2")]);
        let outline = build(&mut headings);

        let roots = outline.roots();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].link.label, "1");
        assert_eq!(roots[0].link.target.as_str(), "toc-0");
        assert_eq!(roots[0].children.len(), 2);
        assert_eq!(roots[0].children[0].link.target.as_str(), "toc-1");
        assert_eq!(roots[0].children[0].children[0].link.label, "1-1-1");
        assert_eq!(roots[0].children[0].children[0].link.target.as_str(), "toc-2");
        assert_eq!(roots[0].children[1].link.target.as_str(), "toc-3");
        assert!(roots[0].children[1].children.is_empty());
        assert_eq!(roots[1].link.target.as_str(), "toc-4");
        assert!(roots[1].children.is_empty());
    }

    #[test]
    fn siblings_rooted_below_h1() {
        let mut headings = headings(&[(2, "1"), (3, "1-1"), (2, "2"), (2, "3"), (3, "3-1")]);
        let outline = build(&mut headings);

        let labels: Vec<_> = outline.roots().iter().map(|n| n.link.label.as_str()).collect();
        assert_eq!(labels, ["1", "2", "3"]);
        assert_eq!(outline.roots()[0].children[0].link.label, "1-1");
        assert!(outline.roots()[1].children.is_empty());
        assert_eq!(outline.roots()[2].children[0].link.label, "3-1");
        assert_eq!(outline.roots()[2].children[0].link.target.as_str(), "toc-4");
    }

    #[test]
    fn stops_at_shallower_heading() {
        let mut headings = headings(&[(1, "a"), (2, "b"), (2, "c"), (1, "d")]);
        let (siblings, next) = build_siblings(&mut headings, 1, &Config::default());
        assert_eq!(siblings.len(), 2);
        assert_eq!(next, 3);
    }

    #[test]
    fn assigns_ids_in_place() {
        let mut headings = headings(&[(1, "Title"), (2, "Subtitle")]);
        build(&mut headings);
        assert_eq!(headings[0].id.as_deref(), Some("toc-0"));
        assert_eq!(headings[1].id.as_deref(), Some("toc-1"));
    }

    #[test]
    fn keeps_existing_ids() {
        let mut headings = headings(&[(1, "Title"), (2, "Usage"), (2, "Notes")]);
        headings[1].id = Some("usage".to_string());
        headings[2].id = Some(String::new());

        let outline = build(&mut headings);

        let targets: Vec<_> = outline.iter().map(|link| link.target.to_string()).collect();
        assert_eq!(targets, ["toc-0", "usage", "toc-2"]);
        assert_eq!(headings[2].id.as_deref(), Some("toc-2"));
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let mut headings = headings(&[(1, "a"), (2, "b"), (3, "c"), (1, "d")]);
        let first = build(&mut headings);
        let ids: Vec<_> = headings.iter().map(|h| h.id.clone()).collect();

        let second = build(&mut headings);

        assert_eq!(first, second);
        assert_eq!(ids, headings.iter().map(|h| h.id.clone()).collect::<Vec<_>>());
    }

    #[test]
    fn labels_empty_headings_by_position() {
        let mut headings = headings(&[(1, "a"), (2, "")]);
        let outline = build(&mut headings);
        assert_eq!(outline.roots()[0].children[0].link.label, "Heading 1");
    }

    #[test]
    fn pre_order_matches_document_order() {
        let spec = [(1, "a"), (2, "b"), (3, "c"), (3, "d"), (2, "e"), (1, "f"), (2, "g")];
        let mut headings = headings(&spec);
        let outline = build(&mut headings);

        let labels: Vec<_> = outline.iter().map(|link| link.label.as_str()).collect();
        let expected: Vec<_> = spec.iter().map(|(_, text)| *text).collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn uses_configured_prefix() {
        let mut config = Config::default();
        config.set_id_prefix("s");
        let mut headings = headings(&[(2, "a"), (3, "b")]);
        let (roots, _) = build_siblings(&mut headings, 0, &config);
        assert_eq!(roots[0].link.target.as_str(), "s0");
        assert_eq!(roots[0].children[0].link.target.as_str(), "s1");
    }

    #[test]
    fn skipped_levels_still_nest_under_a_parent() {
        let mut headings = headings(&[(1, "a"), (3, "b"), (2, "c")]);
        let outline = build(&mut headings);

        assert_eq!(outline.len(), 3);
        let children: Vec<_> = outline.roots()[0]
            .children
            .iter()
            .map(|n| n.link.label.as_str())
            .collect();
        assert_eq!(children, ["b", "c"]);
    }

    #[test]
    fn empty_or_exhausted_input() {
        let (siblings, next) = build_siblings(&mut [], 0, &Config::default());
        assert!(siblings.is_empty());
        assert_eq!(next, 0);

        let mut headings = headings(&[(1, "a")]);
        let (siblings, next) = build_siblings(&mut headings, 1, &Config::default());
        assert!(siblings.is_empty());
        assert_eq!(next, 1);
    }
}
