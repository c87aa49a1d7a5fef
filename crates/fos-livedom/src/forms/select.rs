//! Select and Option Element Implementation
//!
//! A select keeps no option list of its own. Its options are the `<option>`
//! children it holds right now, plus those of its `<optgroup>` children, and
//! its selection is the selectedness flag carried by each option.

use crate::collection::LiveCollection;
use crate::operations::{DomError, DomResult};
use crate::{DomTree, NodeId};

impl DomTree {
    /// Is `id` a `<select>` element?
    pub fn is_select(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.has_tag("select"))
    }

    pub(crate) fn ensure_select(&self, operation: &'static str, id: NodeId) -> DomResult<()> {
        self.node(operation, id)?;
        if self.is_select(id) {
            Ok(())
        } else {
            Err(DomError::InvalidNodeType {
                operation,
                node: id,
                expected: "select",
            })
        }
    }

    /// Live list of options belonging to `select`
    pub fn select_options(&self, select: NodeId) -> DomResult<LiveCollection> {
        self.ensure_select("options", select)?;
        Ok(LiveCollection::options(select))
    }

    /// `HTMLSelectElement.selectedIndex`: first selected option, else -1
    pub fn selected_index(&self, select: NodeId) -> DomResult<i32> {
        let options = self.select_options(select)?;
        let index = options
            .iter(self)
            .position(|opt| self.is_option_selected(opt));
        Ok(index.map_or(-1, |i| i as i32))
    }

    /// Set `selectedIndex`.
    ///
    /// Other options are deselected unless the select has `multiple`. An
    /// out-of-range index only clears.
    pub fn set_selected_index(&mut self, select: NodeId, index: i32) -> DomResult<()> {
        let options = self.select_options(select)?.to_vec(self);
        let multiple = self.has_attribute(select, "multiple");

        if !multiple {
            for &opt in &options {
                self.set_selectedness(opt, false);
            }
        }

        let chosen = usize::try_from(index).ok().and_then(|i| options.get(i).copied());
        if let Some(opt) = chosen {
            self.set_selectedness(opt, true);
        }
        tracing::trace!("Select {} selectedIndex set to {}", select, index);
        Ok(())
    }

    /// `HTMLSelectElement.value`: the selected option's `value` attribute,
    /// falling back to its text
    pub fn select_value(&self, select: NodeId) -> DomResult<String> {
        let options = self.select_options(select)?;
        let selected = options.iter(self).find(|&opt| self.is_option_selected(opt));
        Ok(selected.map(|opt| self.option_value(opt)).unwrap_or_default())
    }

    /// `HTMLOptionElement.value`
    pub fn option_value(&self, option: NodeId) -> String {
        match self.get_attribute(option, "value") {
            Some(value) => value.to_string(),
            None => self.text_content(option).unwrap_or_default(),
        }
    }

    pub fn is_option_selected(&self, option: NodeId) -> bool {
        self.get(option)
            .and_then(|n| n.as_element())
            .is_some_and(|e| e.selectedness)
    }

    /// `HTMLOptionElement.selected`
    pub fn set_option_selected(&mut self, option: NodeId, selected: bool) -> DomResult<()> {
        let node = self.node("selected", option)?;
        if !node.has_tag("option") {
            return Err(DomError::InvalidNodeType {
                operation: "selected",
                node: option,
                expected: "option",
            });
        }
        self.set_selectedness(option, selected);
        Ok(())
    }

    fn set_selectedness(&mut self, option: NodeId, selected: bool) {
        if let Some(elem) = self.get_mut(option).and_then(|n| n.as_element_mut()) {
            elem.selectedness = selected;
        }
    }
}
