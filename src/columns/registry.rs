//! Ordered registry of column definitions
//!
//! Registration order is part of the contract: [`Registry::lookup_by_parsing`]
//! scans definitions in order and the first template that parses the name
//! wins. When one template is a looser pattern of another (`q({who})` also
//! matches `q(x1)`), register the more specific one first.

use super::template::NameTemplate;
use super::{commutation, interest, mortality, term, timeline, whole_of_life};
use super::{Column, Params};
use crate::error::{CalcError, CalcResult};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A registered column with its parsed templates
pub struct ColumnDefinition {
    column: Box<dyn Column>,
    template: NameTemplate,
    dependencies: Vec<NameTemplate>,
}

impl ColumnDefinition {
    pub fn new(column: Box<dyn Column>) -> CalcResult<Self> {
        let template = NameTemplate::parse(column.name_template())?;
        let dependencies = column
            .dependencies()
            .iter()
            .map(|dep| NameTemplate::parse(dep))
            .collect::<CalcResult<Vec<_>>>()?;

        Ok(Self {
            column,
            template,
            dependencies,
        })
    }

    pub fn column(&self) -> &dyn Column {
        self.column.as_ref()
    }

    pub fn template(&self) -> &NameTemplate {
        &self.template
    }

    pub fn dependencies(&self) -> &[NameTemplate] {
        &self.dependencies
    }

    pub fn instantiate_name(&self, params: &Params) -> CalcResult<String> {
        self.template.instantiate(params)
    }

    pub fn try_parse(&self, name: &str) -> Option<Params> {
        self.template.try_parse(name)
    }

    /// Check every required parameter is present
    pub fn validate(&self, params: &Params) -> CalcResult<()> {
        for (name, description) in self.column.parameters() {
            if !params.contains(name) {
                return Err(CalcError::MissingParameter {
                    column: self.template.as_str().to_string(),
                    parameter: name.to_string(),
                    description: description.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDefinition")
            .field("template", &self.template.as_str())
            .field(
                "dependencies",
                &self.dependencies.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    definitions: Vec<ColumnDefinition>,
    by_template: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. A template can only be registered once.
    pub fn register(&mut self, column: impl Column + 'static) -> CalcResult<()> {
        self.register_boxed(Box::new(column))
    }

    pub fn register_boxed(&mut self, column: Box<dyn Column>) -> CalcResult<()> {
        let definition = ColumnDefinition::new(column)?;
        let template = definition.template.as_str().to_string();
        if self.by_template.contains_key(&template) {
            return Err(CalcError::DuplicateTemplate { template });
        }

        self.by_template.insert(template, self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    /// Definition whose template is exactly `template`
    pub fn lookup_exact(&self, template: &str) -> Option<&ColumnDefinition> {
        self.by_template
            .get(template)
            .map(|&index| &self.definitions[index])
    }

    /// First definition, in registration order, whose template parses `name`
    pub fn lookup_by_parsing(&self, name: &str) -> Option<(&ColumnDefinition, Params)> {
        self.definitions
            .iter()
            .find_map(|def| def.try_parse(name).map(|params| (def, params)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// `(template, description)` for every registered column, in order
    pub fn formulae(&self) -> Vec<(&str, &str)> {
        self.definitions
            .iter()
            .map(|def| (def.template.as_str(), def.column.description()))
            .collect()
    }

    /// Registry holding the standard formula library.
    ///
    /// Term-limited templates come first, ahead of the whole-of-life templates
    /// they extend.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        let columns: Vec<Box<dyn Column>> = vec![
            // Term limited
            Box::new(term::TermAnnuityDue),
            Box::new(term::TermAnnuity),
            Box::new(term::TermAssurance),
            Box::new(term::PureEndowment),
            Box::new(term::EndowmentAssurance),
            Box::new(term::TermNetPremium),
            Box::new(term::TermIncreasingAnnuityDue),
            Box::new(term::TermIncreasingAnnuity),
            Box::new(term::TermIncreasingAssurance),
            Box::new(term::IncreasingPureEndowment),
            Box::new(term::IncreasingEndowmentAssurance),
            // Whole of life
            Box::new(whole_of_life::AnnuityDue),
            Box::new(whole_of_life::Annuity),
            Box::new(whole_of_life::Assurance),
            Box::new(whole_of_life::NetPremium),
            Box::new(whole_of_life::IncreasingAssurance),
            Box::new(whole_of_life::IncreasingAnnuityDue),
            Box::new(whole_of_life::IncreasingAnnuity),
            // Mortality
            Box::new(mortality::Age),
            Box::new(mortality::Mortality),
            Box::new(mortality::Survival),
            Box::new(mortality::Lives),
            Box::new(mortality::Deaths),
            // Timeline
            Box::new(timeline::Period),
            Box::new(timeline::RemainingTerm),
            // Interest
            Box::new(interest::InterestRate),
            Box::new(interest::DiscountFactor),
            // Commutation
            Box::new(commutation::CommutationC),
            Box::new(commutation::CommutationD),
            Box::new(commutation::CommutationM),
            Box::new(commutation::CommutationN),
            Box::new(commutation::CommutationR),
            Box::new(commutation::CommutationS),
        ];

        for column in columns {
            registry
                .register_boxed(column)
                .expect("standard column templates are valid and unique");
        }
        registry
    }

    /// Process-wide standard registry, built on first use and never mutated
    pub fn shared() -> Arc<Registry> {
        static SHARED: OnceLock<Arc<Registry>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(Registry::standard())))
    }
}
