//! Folding an option list into the shape a store executes.

use crate::query::option::{Filter, Order, Page, QueryOption};

/// Resolved read shape for one level of a query (the root record or one preloaded
/// association). Preloads are kept in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadPlan {
    pub page: Option<Page>,
    pub order: Option<Order>,
    pub filter: Option<Filter>,
    pub preloads: Vec<(String, ReadPlan)>,
}

impl ReadPlan {
    pub fn from_options(options: &[QueryOption]) -> Self {
        let mut plan = ReadPlan::default();
        plan.apply(options);
        plan
    }

    /// Apply options on top of this plan; later Page/OrderBy/FilterBy overwrite earlier ones.
    pub fn apply(&mut self, options: &[QueryOption]) {
        for option in options {
            match option {
                QueryOption::Page(p) => self.page = Some(p.clone()),
                QueryOption::OrderBy(o) => self.order = Some(o.clone()),
                QueryOption::FilterBy(f) => self.filter = Some(f.clone()),
                QueryOption::Preload(p) => {
                    let leaf = self.descend(&p.path);
                    if let Some(leaf) = leaf {
                        leaf.apply(&p.scope);
                    }
                }
            }
        }
    }

    /// Walk (creating as needed) the nested plan for a dotted path. Empty segments are skipped;
    /// an all-empty path yields None.
    fn descend(&mut self, path: &str) -> Option<&mut ReadPlan> {
        let mut segments = path.split('.').filter(|s| !s.is_empty()).peekable();
        segments.peek()?;
        let mut node = self;
        for segment in segments {
            let idx = match node.preloads.iter().position(|(name, _)| name == segment) {
                Some(i) => i,
                None => {
                    node.preloads.push((segment.to_string(), ReadPlan::default()));
                    node.preloads.len() - 1
                }
            };
            node = &mut node.preloads[idx].1;
        }
        Some(node)
    }
}

#[cfg(test)]
impl ReadPlan {
    fn preload(&self, name: &str) -> Option<&ReadPlan> {
        self.preloads.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    /// Dotted paths of every preload in this plan, depth-first.
    fn preload_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (name, child) in &self.preloads {
            out.push(name.clone());
            for sub in child.preload_paths() {
                out.push(format!("{}.{}", name, sub));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::option::Preload;

    #[test]
    fn later_scalar_options_overwrite() {
        let plan = ReadPlan::from_options(&[
            QueryOption::page(10, 0),
            QueryOption::order_by("id", false),
            QueryOption::page(5, 5),
            QueryOption::order_by("name", true),
        ]);
        assert_eq!(plan.page, Some(Page { limit: 5, offset: 5 }));
        assert_eq!(plan.order.unwrap().field, "name");
    }

    #[test]
    fn preloads_accumulate_and_merge_by_path() {
        let plan = ReadPlan::from_options(&[
            QueryOption::preload("Orders.Product"),
            QueryOption::preload("Profile"),
            QueryOption::preload("Orders"),
        ]);
        assert_eq!(plan.preload_paths(), vec!["Orders", "Orders.Product", "Profile"]);
    }

    #[test]
    fn scoped_preload_applies_to_association() {
        let plan = ReadPlan::from_options(&[QueryOption::Preload(Preload::scoped(
            "Orders",
            vec![
                QueryOption::page(2, 0),
                QueryOption::filter_by("status", "open"),
                QueryOption::preload("Product"),
            ],
        ))]);
        assert!(plan.page.is_none());
        assert!(plan.filter.is_none());
        let orders = plan.preload("Orders").unwrap();
        assert_eq!(orders.page, Some(Page { limit: 2, offset: 0 }));
        assert_eq!(orders.filter.as_ref().unwrap().value, "open");
        assert_eq!(plan.preload_paths(), vec!["Orders", "Orders.Product"]);
    }

    #[test]
    fn empty_preload_path_is_ignored() {
        let plan = ReadPlan::from_options(&[QueryOption::preload(""), QueryOption::preload(".")]);
        assert!(plan.preloads.is_empty());
    }
}
