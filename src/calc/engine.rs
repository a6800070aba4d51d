//! Lazy column resolution
//!
//! `populate` maps a column name to its definition (verbatim template first,
//! then a first-match parse in registration order), makes sure every dependency
//! exists, computes the column and writes it back. Presence in the table is the
//! memo: an existing column is returned untouched unless recomputation is
//! forced, in which case every transitive dependency is recomputed too.
//!
//! Each call keeps a stack of the names it is currently resolving so that a
//! dependency cycle is reported instead of overflowing the stack.

use super::Calc;
use crate::columns::{ColumnDefinition, Params};
use crate::error::{CalcError, CalcResult};
use log::{debug, trace};
use std::sync::Arc;

impl Calc {
    /// Ensure `column` and everything it depends on exists, returning its name.
    ///
    /// With `force` the column and all its transitive dependencies are
    /// recomputed, except seed columns which hold inputs.
    pub fn populate(&mut self, column: &str, force: bool) -> CalcResult<String> {
        let mut resolving = Vec::new();
        self.resolve(column, force, &mut resolving)
    }

    /// Populate several columns in order
    pub fn populate_all<S: AsRef<str>>(&mut self, columns: &[S], force: bool) -> CalcResult<Vec<String>> {
        columns
            .iter()
            .map(|column| self.populate(column.as_ref(), force))
            .collect()
    }

    /// Populate the definition registered under `template` with explicit parameters
    pub fn populate_template(&mut self, template: &str, params: &Params, force: bool) -> CalcResult<String> {
        let registry = Arc::clone(&self.registry);
        let definition = registry
            .lookup_exact(template)
            .ok_or_else(|| CalcError::UnresolvableColumn {
                column: template.to_string(),
            })?;

        let mut resolving = Vec::new();
        self.populate_definition(definition, params, force, &mut resolving)
    }

    fn resolve(&mut self, column: &str, force: bool, resolving: &mut Vec<String>) -> CalcResult<String> {
        let registry = Arc::clone(&self.registry);

        if let Some(definition) = registry.lookup_exact(column) {
            return self.populate_definition(definition, &Params::new(), force, resolving);
        }

        match registry.lookup_by_parsing(column) {
            Some((definition, params)) => {
                trace!("{} parsed as {}", column, definition.template().as_str());
                self.populate_definition(definition, &params, force, resolving)
            }
            None => Err(CalcError::UnresolvableColumn {
                column: column.to_string(),
            }),
        }
    }

    fn populate_definition(
        &mut self,
        definition: &ColumnDefinition,
        params: &Params,
        force: bool,
        resolving: &mut Vec<String>,
    ) -> CalcResult<String> {
        if definition.column().is_seed() {
            if let Ok(name) = definition.instantiate_name(params) {
                if self.table.has_column(&name) {
                    return Ok(name);
                }
            }
        }

        definition.validate(params)?;
        let name = definition.instantiate_name(params)?;

        if !force && self.table.has_column(&name) {
            trace!("{} already populated", name);
            return Ok(name);
        }

        if resolving.contains(&name) {
            let mut chain = resolving.clone();
            chain.push(name.clone());
            return Err(CalcError::CircularDependency { column: name, chain });
        }

        resolving.push(name);
        let result = self.compute(definition, params, force, resolving);
        resolving.pop();
        result
    }

    fn compute(
        &mut self,
        definition: &ColumnDefinition,
        params: &Params,
        force: bool,
        resolving: &mut Vec<String>,
    ) -> CalcResult<String> {
        let name = definition.instantiate_name(params)?;

        for dependency in definition.dependencies() {
            let dependency = dependency.instantiate(params)?;
            if force || !self.table.has_column(&dependency) {
                self.resolve(&dependency, force, resolving)?;
            }
        }

        debug!("calculating {}", name);
        let column = definition.column();
        let mut values = column.calculate(self, params)?;
        if let Some(default) = column.default_fill() {
            values = values.fill_null(default);
        }

        self.table.set_column(name.clone(), values)?;
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{Column, Registry};
    use crate::series::Series;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Base {
        calls: Arc<AtomicUsize>,
    }

    impl Column for Base {
        fn name_template(&self) -> &'static str {
            "base{id}"
        }
        fn description(&self) -> &'static str {
            "Row number plus id."
        }
        fn parameters(&self) -> &'static [(&'static str, &'static str)] {
            &[("id", "Identifier (int)")]
        }
        fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let id = params.get_int("id")? as f64;
            Ok((0..calc.row_count()).map(|t| t as f64 + id).collect())
        }
    }

    #[derive(Default)]
    struct Doubled {
        calls: Arc<AtomicUsize>,
    }

    impl Column for Doubled {
        fn name_template(&self) -> &'static str {
            "double(base{id})"
        }
        fn description(&self) -> &'static str {
            "Twice the base column."
        }
        fn parameters(&self) -> &'static [(&'static str, &'static str)] {
            &[("id", "Identifier (int)")]
        }
        fn dependencies(&self) -> &'static [&'static str] {
            &["base{id}"]
        }
        fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let base = calc.column(&format!("base{}", params.require("id")?))?;
            Ok(base * 2.0)
        }
    }

    #[derive(Default)]
    struct Quadrupled {
        calls: Arc<AtomicUsize>,
    }

    impl Column for Quadrupled {
        fn name_template(&self) -> &'static str {
            "quad(base{id})"
        }
        fn description(&self) -> &'static str {
            "Twice the doubled column."
        }
        fn parameters(&self) -> &'static [(&'static str, &'static str)] {
            &[("id", "Identifier (int)")]
        }
        fn dependencies(&self) -> &'static [&'static str] {
            &["double(base{id})"]
        }
        fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let doubled = calc.column(&format!("double(base{})", params.require("id")?))?;
            Ok(doubled * 2.0)
        }
    }

    struct Sparse;

    impl Column for Sparse {
        fn name_template(&self) -> &'static str {
            "sparse"
        }
        fn description(&self) -> &'static str {
            "Only the first row has a value."
        }
        fn default_fill(&self) -> Option<f64> {
            Some(-1.0)
        }
        fn calculate(&self, calc: &Calc, _params: &Params) -> CalcResult<Series> {
            Ok(Series::full(calc.row_count(), 7.0).head(1))
        }
    }

    struct Short;

    impl Column for Short {
        fn name_template(&self) -> &'static str {
            "short"
        }
        fn description(&self) -> &'static str {
            "Returns the wrong number of rows."
        }
        fn calculate(&self, _calc: &Calc, _params: &Params) -> CalcResult<Series> {
            Ok(Series::full(1, 0.0))
        }
    }

    struct Stub;

    impl Column for Stub {
        fn name_template(&self) -> &'static str {
            "stub"
        }
        fn description(&self) -> &'static str {
            "Registered before its formula exists."
        }
    }

    struct Ping;

    impl Column for Ping {
        fn name_template(&self) -> &'static str {
            "ping"
        }
        fn description(&self) -> &'static str {
            "Depends on pong."
        }
        fn dependencies(&self) -> &'static [&'static str] {
            &["pong"]
        }
    }

    struct Pong;

    impl Column for Pong {
        fn name_template(&self) -> &'static str {
            "pong"
        }
        fn description(&self) -> &'static str {
            "Depends on ping."
        }
        fn dependencies(&self) -> &'static [&'static str] {
            &["ping"]
        }
    }

    fn counted_calc(base: Base, doubled: Doubled, quadrupled: Quadrupled) -> Calc {
        let mut registry = Registry::new();
        registry.register(quadrupled).unwrap();
        registry.register(doubled).unwrap();
        registry.register(base).unwrap();
        registry.register(Sparse).unwrap();
        registry.register(Short).unwrap();
        registry.register(Stub).unwrap();
        registry.register(Ping).unwrap();
        registry.register(Pong).unwrap();

        let mut calc = Calc::with_registry(Arc::new(registry));
        calc.table.set_column("seed", Series::full(4, 0.0)).unwrap();
        calc
    }

    fn test_calc() -> Calc {
        counted_calc(Base::default(), Doubled::default(), Quadrupled::default())
    }

    #[test]
    fn test_memoisation_and_forced_recomputation() {
        let base = Base::default();
        let doubled = Doubled::default();
        let base_calls = Arc::clone(&base.calls);
        let doubled_calls = Arc::clone(&doubled.calls);
        let mut calc = counted_calc(base, doubled, Quadrupled::default());

        let name = calc.populate("double(base1)", false).unwrap();
        assert_eq!(name, "double(base1)");
        assert!(calc.has_column("base1"));
        assert_eq!(base_calls.load(Ordering::SeqCst), 1);
        assert_eq!(doubled_calls.load(Ordering::SeqCst), 1);
        let before = calc.column("double(base1)").unwrap().clone();
        assert_eq!(before.get(3), Some(8.0));

        // Second call is a no-op
        assert_eq!(calc.populate("double(base1)", false).unwrap(), name);
        assert_eq!(base_calls.load(Ordering::SeqCst), 1);
        assert_eq!(doubled_calls.load(Ordering::SeqCst), 1);
        assert_eq!(calc.column("double(base1)").unwrap(), &before);

        // Forcing recomputes the column and its dependencies
        calc.populate("double(base1)", true).unwrap();
        assert_eq!(base_calls.load(Ordering::SeqCst), 2);
        assert_eq!(doubled_calls.load(Ordering::SeqCst), 2);
        assert_eq!(calc.column("double(base1)").unwrap(), &before);
    }

    #[test]
    fn test_forcing_reaches_every_level() {
        let base = Base::default();
        let doubled = Doubled::default();
        let quadrupled = Quadrupled::default();
        let calls = [
            Arc::clone(&base.calls),
            Arc::clone(&doubled.calls),
            Arc::clone(&quadrupled.calls),
        ];
        let counts = |calls: &[Arc<AtomicUsize>]| -> Vec<usize> {
            calls.iter().map(|c| c.load(Ordering::SeqCst)).collect()
        };
        let mut calc = counted_calc(base, doubled, quadrupled);

        calc.populate("quad(base1)", false).unwrap();
        assert_eq!(counts(&calls), [1, 1, 1]);
        assert_eq!(calc.column("quad(base1)").unwrap().get(3), Some(16.0));

        // Overwrite the bottom of the chain; only a transitive force can repair it
        calc.table.set_column("base1", Series::full(4, 0.0)).unwrap();
        calc.populate("quad(base1)", false).unwrap();
        assert_eq!(counts(&calls), [1, 1, 1]);

        calc.populate("quad(base1)", true).unwrap();
        assert_eq!(counts(&calls), [2, 2, 2]);
        assert_eq!(calc.column("base1").unwrap().get(3), Some(4.0));
        assert_eq!(calc.column("double(base1)").unwrap().get(3), Some(8.0));
        assert_eq!(calc.column("quad(base1)").unwrap().get(3), Some(16.0));
    }

    #[test]
    fn test_missing_parameter_for_bare_template() {
        let mut calc = test_calc();

        let err = calc.populate("base{id}", false).unwrap_err();
        assert_eq!(
            err,
            CalcError::MissingParameter {
                column: "base{id}".to_string(),
                parameter: "id".to_string(),
                description: "Identifier (int)".to_string(),
            }
        );
    }

    #[test]
    fn test_unresolvable_column() {
        let mut calc = test_calc();

        assert_eq!(
            calc.populate("triple(base1)", false),
            Err(CalcError::UnresolvableColumn {
                column: "triple(base1)".to_string()
            })
        );
    }

    #[test]
    fn test_default_fill_replaces_nulls() {
        let mut calc = test_calc();
        calc.populate("sparse", false).unwrap();

        assert_eq!(
            calc.column("sparse").unwrap(),
            &Series::from(vec![7.0, -1.0, -1.0, -1.0])
        );
    }

    #[test]
    fn test_dimension_mismatch_is_not_written() {
        let mut calc = test_calc();

        assert!(matches!(
            calc.populate("short", false),
            Err(CalcError::DimensionMismatch { expected: 4, actual: 1, .. })
        ));
        assert!(!calc.has_column("short"));
    }

    #[test]
    fn test_unimplemented_calculation() {
        let mut calc = test_calc();

        assert_eq!(
            calc.populate("stub", false),
            Err(CalcError::Unimplemented {
                column: "stub".to_string()
            })
        );
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut calc = test_calc();

        match calc.populate("ping", false) {
            Err(CalcError::CircularDependency { column, chain }) => {
                assert_eq!(column, "ping");
                assert_eq!(chain, vec!["ping", "pong", "ping"]);
            }
            other => panic!("expected a cycle, got {:?}", other),
        }
        assert!(!calc.has_column("ping"));
        assert!(!calc.has_column("pong"));
    }

    #[test]
    fn test_populate_all() {
        let mut calc = test_calc();
        let names = calc.populate_all(&["base2", "sparse"], false).unwrap();

        assert_eq!(names, vec!["base2", "sparse"]);
        assert_eq!(calc.column("base2").unwrap().get(0), Some(2.0));
    }
}
