//! Presentation: list-table column, add/edit form fields and quick edit

use crate::columns::ColumnSet;
use crate::controller::TermMetaUi;
use crate::hooks::{ColumnCell, QuickEditBox};
use crate::markup::{esc_attr, esc_html};
use crate::request::{EDIT_TAGS_SCREEN, Request};
use termmeta_common::{Result, Term};
use tracing::debug;

impl TermMetaUi {
    /// Append this field's column to a list table's columns
    #[must_use]
    pub fn add_column_header(&self, mut columns: ColumnSet) -> ColumnSet {
        columns.insert(self.meta_key(), self.spec.labels.singular.as_str());
        columns
    }

    /// Render this field's cell for one term row.
    ///
    /// Produces nothing unless the request carries a taxonomy, the column is
    /// this field's, and no earlier renderer already filled the cell.
    ///
    /// # Errors
    /// Propagates host storage faults.
    pub fn add_column_value(
        &self,
        prior: &str,
        cell: &ColumnCell<'_>,
        request: &Request,
        out: &mut String,
    ) -> Result<()> {
        if request.taxonomy().is_none() || cell.column_name != self.meta_key() || !prior.is_empty() {
            return Ok(());
        }

        let value = self.get_value(cell.term_id)?;
        if value.is_empty() {
            out.push_str(&self.spec.no_value);
        } else {
            out.push_str(&self.format_output(&value));
        }
        Ok(())
    }

    /// Declare this field's column sortable by its own key
    #[must_use]
    pub fn sortable_columns(&self, mut columns: ColumnSet) -> ColumnSet {
        columns.insert(self.meta_key(), self.meta_key());
        columns
    }

    /// Markup for a non-empty value: the strategy's in fancy mode, escaped text otherwise
    #[must_use]
    pub fn format_output(&self, value: &str) -> String {
        if self.spec.fancy {
            self.strategy.format_value(value)
        } else {
            esc_html(value).into_owned()
        }
    }

    /// Field for the "add new term" form
    pub fn add_form_field(&self, out: &mut String) {
        let key = esc_attr(self.meta_key());
        out.push_str(&format!("<div class=\"form-field term-{key}-wrap\">\n"));
        out.push_str(&format!(
            "\t<label for=\"term-{key}\">{}</label>\n",
            esc_html(&self.spec.labels.singular)
        ));
        out.push('\t');
        out.push_str(&self.text_input(""));
        out.push('\n');
        self.description("\t", out);
        out.push_str("</div>\n");
    }

    /// Table row for the "edit term" form, pre-filled with the stored value
    ///
    /// # Errors
    /// Propagates host storage faults.
    pub fn edit_form_field(&self, term: Option<&Term>, out: &mut String) -> Result<()> {
        let key = esc_attr(self.meta_key());
        out.push_str(&format!("<tr class=\"form-field term-{key}-wrap\">\n"));
        out.push_str("\t<th scope=\"row\" valign=\"top\">\n");
        out.push_str(&format!(
            "\t\t<label for=\"term-{key}\">{}</label>\n",
            esc_html(&self.spec.labels.singular)
        ));
        out.push_str("\t</th>\n\t<td>\n\t\t");
        out.push_str(&self.form_field(term)?);
        out.push('\n');
        self.description("\t\t", out);
        out.push_str("\t</td>\n</tr>\n");
        Ok(())
    }

    /// Quick-edit box for the term list screen.
    ///
    /// Returns `false` without output unless the column is this field's, the
    /// screen is the term list, and the taxonomy is UI-visible. The input is
    /// left empty; the client fills it from the row being edited.
    ///
    /// # Errors
    /// Propagates taxonomy enumeration faults.
    pub fn quick_edit_meta(&self, quick_edit: &QuickEditBox<'_>, out: &mut String) -> Result<bool> {
        if quick_edit.column_name != self.meta_key()
            || quick_edit.screen != EDIT_TAGS_SCREEN
            || !self.is_visible_taxonomy(quick_edit.taxonomy)?
        {
            debug!(
                meta_key = self.meta_key(),
                column = quick_edit.column_name,
                screen = quick_edit.screen,
                taxonomy = quick_edit.taxonomy,
                "Quick edit box not for this field"
            );
            return Ok(false);
        }

        out.push_str("<fieldset>\n\t<div class=\"inline-edit-col\">\n\t\t<label>\n");
        out.push_str(&format!(
            "\t\t\t<span class=\"title\">{}</span>\n",
            esc_html(&self.spec.labels.singular)
        ));
        out.push_str("\t\t\t<span class=\"input-text-wrap\">");
        out.push_str(&self.quick_edit_form_field());
        out.push_str("</span>\n\t\t</label>\n\t</div>\n</fieldset>\n");
        Ok(true)
    }

    /// Text input named `term-<key>`, holding the term's value when editing
    ///
    /// # Errors
    /// Propagates host storage faults.
    pub fn form_field(&self, term: Option<&Term>) -> Result<String> {
        let value = match term {
            Some(term) => self.get_value(term.term_id)?,
            None => String::new(),
        };
        Ok(self.text_input(&value))
    }

    /// Quick-edit input; never server-filled
    #[must_use]
    pub fn quick_edit_form_field(&self) -> String {
        format!(
            "<input type=\"text\" class=\"ptitle\" name=\"term-{}\" value=\"\">",
            esc_attr(self.meta_key())
        )
    }

    fn text_input(&self, value: &str) -> String {
        let key = esc_attr(self.meta_key());
        format!(
            "<input type=\"text\" name=\"term-{key}\" id=\"term-{key}\" value=\"{}\">",
            esc_attr(value)
        )
    }

    fn description(&self, indent: &str, out: &mut String) {
        if !self.spec.labels.description.is_empty() {
            out.push_str(&format!(
                "{indent}<p class=\"description\">{}</p>\n",
                esc_html(&self.spec.labels.description)
            ));
        }
    }
}
