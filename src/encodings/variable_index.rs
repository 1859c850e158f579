use crate::{
    formula::{CnfFormula, CnfLiteral},
    sat::{Literal, SatSolver, Variable},
};
use std::collections::HashMap;

/// A bidirectional mapping between named propositional variables and SAT solver variables.
///
/// Named variables get their solver variables on demand, in the order they are first met.
/// Anonymous variables (selectors, auxiliary variables of cardinality encodings) share the same counter,
/// so that named and anonymous variables never collide.
#[derive(Debug, Default, Clone)]
pub struct VariableIndex {
    ids: HashMap<String, Variable>,
    names: Vec<Option<String>>,
}

impl VariableIndex {
    /// Returns the solver variable associated with a name, creating it if needed.
    pub fn get_or_insert(&mut self, name: &str) -> Variable {
        if let Some(v) = self.ids.get(name) {
            return *v;
        }
        self.names.push(Some(name.to_string()));
        let v = Variable::from(self.names.len());
        self.ids.insert(name.to_string(), v);
        v
    }

    /// Returns the solver variable associated with a name, if any.
    pub fn get(&self, name: &str) -> Option<Variable> {
        self.ids.get(name).copied()
    }

    /// Returns the name of a solver variable, if it is a named one.
    pub fn name_of(&self, v: Variable) -> Option<&str> {
        self.names
            .get(usize::from(v) - 1)
            .and_then(|n| n.as_deref())
    }

    /// Creates a new anonymous variable.
    pub fn new_anonymous(&mut self) -> Variable {
        self.names.push(None);
        Variable::from(self.names.len())
    }

    /// Creates `n` anonymous variables at once.
    ///
    /// This function is used when an external encoder allocates variables by itself.
    pub fn reserve_anonymous(&mut self, n: usize) {
        self.names.resize(self.names.len() + n, None);
    }

    /// Returns the number of variables (named and anonymous) allocated so far.
    pub fn n_vars(&self) -> usize {
        self.names.len()
    }

    /// Translates a CNF literal into a solver literal, creating its variable if needed.
    pub fn literal(&mut self, l: &CnfLiteral) -> Literal {
        self.get_or_insert(l.variable()).literal(l.is_positive())
    }

    /// Adds the clauses of a CNF formula into a SAT solver.
    pub fn encode_cnf(&mut self, cnf: &CnfFormula, solver: &mut dyn SatSolver) {
        cnf.clauses().iter().for_each(|cl| {
            let solver_clause = cl
                .literals()
                .iter()
                .map(|l| self.literal(l))
                .collect::<Vec<Literal>>();
            solver.add_clause(solver_clause)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::CnfClause;
    use crate::sat::{CadicalSolver, SatSolver};

    #[test]
    fn test_named_and_anonymous() {
        let mut index = VariableIndex::default();
        let a = index.get_or_insert("a");
        let s = index.new_anonymous();
        let b = index.get_or_insert("b");
        assert_eq!(a, index.get_or_insert("a"));
        assert_eq!(1, usize::from(a));
        assert_eq!(2, usize::from(s));
        assert_eq!(3, usize::from(b));
        assert_eq!(Some("b"), index.name_of(b));
        assert_eq!(None, index.name_of(s));
        index.reserve_anonymous(4);
        assert_eq!(7, index.n_vars());
        assert_eq!(Variable::from(8), index.get_or_insert("c"));
        assert_eq!(None, index.get("d"));
    }

    #[test]
    fn test_encode_cnf() {
        let cnf = CnfFormula::new(vec![
            CnfClause::new(vec![CnfLiteral::positive("a"), CnfLiteral::negative("b")]),
            CnfClause::new(vec![CnfLiteral::positive("b")]),
        ]);
        let mut index = VariableIndex::default();
        let mut solver = CadicalSolver::default();
        index.encode_cnf(&cnf, &mut solver);
        let model = solver.solve().into_model().unwrap().unwrap();
        assert_eq!(Some(true), model.value_of(index.get("a").unwrap()));
        assert_eq!(Some(true), model.value_of(index.get("b").unwrap()));
    }
}
