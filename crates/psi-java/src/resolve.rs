//! Reference resolution by scope walking.
//!
//! A reference expression resolves according to its parent: as the method of
//! a call it goes through overload selection, inside a `case` label of a
//! switch over an enum it first tries that enum's constants, and otherwise it
//! tries variables, then classes, then packages, the first non-empty answer
//! winning. Only declarations in the tree are visible; a name that refers to
//! a library class resolves to nothing.

use std::cell::Cell;

use psi_syntax::{tables, SyntaxKind};
use serde::Serialize;

use crate::role::Role;
use crate::types::{JavaType, PrimitiveType};
use crate::{NodeId, SyntaxTree};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ResolvedElement {
    /// Field, local, parameter, resource or enum constant.
    Variable(NodeId),
    /// Method or constructor.
    Method(NodeId),
    /// Class, interface, enum, annotation type or type parameter.
    Class(NodeId),
    Package(String),
}

impl ResolvedElement {
    pub fn node(&self) -> Option<NodeId> {
        match self {
            ResolvedElement::Variable(id)
            | ResolvedElement::Method(id)
            | ResolvedElement::Class(id) => Some(*id),
            ResolvedElement::Package(_) => None,
        }
    }
}

const MAX_DEPTH: usize = 64;

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Bounds mutual recursion through cyclic supertypes in broken code.
struct DepthGuard {
    entered: bool,
}

impl DepthGuard {
    fn enter() -> DepthGuard {
        let entered = DEPTH.with(|depth| {
            let current = depth.get();
            if current >= MAX_DEPTH {
                return false;
            }
            depth.set(current + 1);
            true
        });
        DepthGuard { entered }
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        if self.entered {
            DEPTH.with(|depth| depth.set(depth.get() - 1));
        }
    }
}

impl SyntaxTree {
    /// Every candidate for a reference expression or code reference.
    pub fn multi_resolve(&self, reference: NodeId) -> Vec<ResolvedElement> {
        let guard = DepthGuard::enter();
        if !guard.entered {
            tracing::debug!(?reference, "resolution nested too deeply");
            return Vec::new();
        }
        let resolved = match self.kind(reference) {
            SyntaxKind::ReferenceExpression => self.resolve_reference_expression(reference),
            SyntaxKind::JavaCodeReference => self.resolve_code_reference(reference),
            _ => Vec::new(),
        };
        if resolved.is_empty() {
            tracing::trace!(reference = %self.text(reference).trim(), "unresolved");
        }
        resolved
    }

    /// The first candidate.
    pub fn resolve(&self, reference: NodeId) -> Option<ResolvedElement> {
        self.multi_resolve(reference).into_iter().next()
    }

    /// The candidate when there is exactly one.
    pub fn advanced_resolve(&self, reference: NodeId) -> Option<ResolvedElement> {
        let mut candidates = self.multi_resolve(reference);
        if candidates.len() == 1 {
            candidates.pop()
        } else {
            None
        }
    }

    /// Resolution for code being typed: when the context-specific attempt
    /// finds nothing, a reference expression is retried as a plain name.
    pub fn resolve_incomplete(&self, reference: NodeId) -> Vec<ResolvedElement> {
        let resolved = self.multi_resolve(reference);
        if resolved.is_empty() && self.kind(reference) == SyntaxKind::ReferenceExpression {
            return self.resolve_as_plain_name(reference);
        }
        resolved
    }

    /// The class a code reference names, if it names one in the tree.
    pub fn resolve_class_reference(&self, reference: NodeId) -> Option<NodeId> {
        self.multi_resolve(reference)
            .into_iter()
            .find_map(|element| match element {
                ResolvedElement::Class(class) => Some(class),
                _ => None,
            })
    }

    fn resolve_reference_expression(&self, reference: NodeId) -> Vec<ResolvedElement> {
        let call = self.parent(reference).filter(|&parent| {
            self.kind(parent) == SyntaxKind::MethodCallExpression
                && self.method_expression(parent) == Some(reference)
        });
        if let Some(call) = call {
            return self.resolve_method_call(call, reference);
        }
        if let Some(constant) = self.resolve_enum_case_label(reference) {
            return vec![ResolvedElement::Variable(constant)];
        }
        self.resolve_as_plain_name(reference)
    }

    fn resolve_as_plain_name(&self, reference: NodeId) -> Vec<ResolvedElement> {
        let Some(name) = self.reference_name(reference) else {
            return Vec::new();
        };
        let found = match self.qualifier(reference) {
            None => self
                .resolve_variable(reference, &name)
                .map(ResolvedElement::Variable)
                .or_else(|| self.resolve_class(reference, &name).map(ResolvedElement::Class))
                .or_else(|| {
                    self.package_exists(reference, &name)
                        .then(|| ResolvedElement::Package(name.to_string()))
                }),
            Some(qualifier) => self.resolve_member(qualifier, &name),
        };
        found.into_iter().collect()
    }

    /// `name` looked up in whatever `qualifier` denotes.
    fn resolve_member(&self, qualifier: NodeId, name: &str) -> Option<ResolvedElement> {
        match self.resolve(qualifier) {
            Some(ResolvedElement::Package(package)) => {
                let qualified = format!("{package}.{name}");
                self.find_class_by_qualified_name(qualifier, &qualified)
                    .map(ResolvedElement::Class)
                    .or_else(|| {
                        self.package_exists(qualifier, &qualified)
                            .then(|| ResolvedElement::Package(qualified))
                    })
            }
            Some(ResolvedElement::Class(class)) => self
                .find_field_in_hierarchy(class, name)
                .map(ResolvedElement::Variable)
                .or_else(|| {
                    self.find_inner_class_in_hierarchy(class, name)
                        .map(ResolvedElement::Class)
                }),
            _ => {
                let class = self.expression_type(qualifier)?.class()?.declaration?;
                self.find_field_in_hierarchy(class, name)
                    .map(ResolvedElement::Variable)
            }
        }
    }

    /// The class `qualifier` names or whose instance it evaluates to.
    fn qualifier_class(&self, qualifier: NodeId) -> Option<NodeId> {
        if let Some(ResolvedElement::Class(class)) = self.resolve(qualifier) {
            return Some(class);
        }
        self.expression_type(qualifier)?.class()?.declaration
    }

    fn resolve_enum_case_label(&self, reference: NodeId) -> Option<NodeId> {
        if self.qualifier(reference).is_some() {
            return None;
        }
        let label = self.parent(reference)?;
        if self.kind(label) != SyntaxKind::SwitchLabelStatement
            || self.case_expression(label) != Some(reference)
        {
            return None;
        }
        let switch = self.parent(label).and_then(|body| self.parent(body))?;
        if self.kind(switch) != SyntaxKind::SwitchStatement {
            return None;
        }
        let class = self
            .expression_type(self.condition(switch)?)?
            .class()?
            .declaration?;
        if !self.is_enum(class) {
            return None;
        }
        let name = self.reference_name(reference)?;
        self.enum_constants(class)
            .into_iter()
            .find(|&constant| self.name(constant).as_deref() == Some(name.as_str()))
    }

    // --- variables ---------------------------------------------------------

    fn resolve_variable(&self, place: NodeId, name: &str) -> Option<NodeId> {
        let mut prev = place;
        for scope in self.ancestors(place).skip(1) {
            let found = match self.kind(scope) {
                SyntaxKind::CodeBlock => self.local_variable_before(scope, prev, name),
                SyntaxKind::ForStatement => self
                    .find_child_by_role(scope, Role::ForInitialization)
                    .filter(|&init| init != prev)
                    .and_then(|init| self.named_local(init, name)),
                SyntaxKind::ForeachStatement => self
                    .find_child_by_role(scope, Role::ForIterationParameter)
                    .filter(|_| self.find_child_by_role(scope, Role::IteratedValue) != Some(prev))
                    .filter(|&param| self.name(param).as_deref() == Some(name)),
                SyntaxKind::CatchSection => self
                    .find_child_by_role(scope, Role::CatchBlockParameter)
                    .filter(|&param| param != prev && self.name(param).as_deref() == Some(name)),
                SyntaxKind::TryStatement => self
                    .find_child_by_role(scope, Role::ResourceList)
                    .filter(|&list| list != prev)
                    .and_then(|list| {
                        self.children_of_kind(list, SyntaxKind::ResourceVariable)
                            .find(|&var| self.name(var).as_deref() == Some(name))
                    }),
                SyntaxKind::ResourceList => self
                    .children(scope)
                    .iter()
                    .copied()
                    .take_while(|&child| child != prev)
                    .filter(|&child| self.kind(child) == SyntaxKind::ResourceVariable)
                    .find(|&var| self.name(var).as_deref() == Some(name)),
                SyntaxKind::Method | SyntaxKind::AnnotationMethod => self
                    .parameters(scope)
                    .into_iter()
                    .find(|&param| self.name(param).as_deref() == Some(name)),
                kind if tables::CLASS_BODIES.contains(kind) && self.is_member(prev) => {
                    self.find_field_in_hierarchy(scope, name)
                }
                SyntaxKind::JavaFile => self.statically_imported_field(scope, name),
                _ => None,
            };
            if found.is_some() {
                return found;
            }
            prev = scope;
        }
        None
    }

    fn is_member(&self, id: NodeId) -> bool {
        tables::CLASS_MEMBERS.contains(self.kind(id))
    }

    /// The last local named `name` declared in `block` up to the statement
    /// containing `place`.
    fn local_variable_before(&self, block: NodeId, place: NodeId, name: &str) -> Option<NodeId> {
        let mut found = None;
        for &stmt in self.children(block) {
            if let Some(var) = self.named_local(stmt, name) {
                found = Some(var);
            }
            if stmt == place {
                break;
            }
        }
        found
    }

    fn named_local(&self, stmt: NodeId, name: &str) -> Option<NodeId> {
        if self.kind(stmt) != SyntaxKind::DeclarationStatement {
            return None;
        }
        self.declared_variables(stmt).into_iter().find(|&var| {
            self.kind(var) == SyntaxKind::LocalVariable && self.name(var).as_deref() == Some(name)
        })
    }

    fn statically_imported_field(&self, file: NodeId, name: &str) -> Option<NodeId> {
        self.static_imports_of(file, name)
            .find_map(|class| self.find_field_in_hierarchy(class, name))
    }

    /// In-tree classes whose member `name` a static import brings in.
    fn static_imports_of<'a>(
        &'a self,
        file: NodeId,
        name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.imports(file)
            .into_iter()
            .filter(|&import| self.is_static_import(import))
            .filter_map(move |import| {
                let imported = self.import_name(import);
                let class_name = if self.is_on_demand(import) {
                    imported
                } else {
                    let (class_name, member) = imported.rsplit_once('.')?;
                    if member != name {
                        return None;
                    }
                    class_name.to_string()
                };
                self.find_class_by_qualified_name(file, &class_name)
            })
    }

    // --- classes and packages ----------------------------------------------

    fn resolve_class(&self, place: NodeId, name: &str) -> Option<NodeId> {
        let mut prev = place;
        for scope in self.ancestors(place).skip(1) {
            let found = match self.kind(scope) {
                SyntaxKind::CodeBlock => self.local_class_before(scope, prev, name),
                SyntaxKind::Method | SyntaxKind::AnnotationMethod => {
                    self.type_parameter(scope, name)
                }
                SyntaxKind::Class => self.type_parameter(scope, name).or_else(|| {
                    if self.name(scope).as_deref() == Some(name) {
                        Some(scope)
                    } else if self.is_member(prev) {
                        self.find_inner_class_in_hierarchy(scope, name)
                    } else {
                        None
                    }
                }),
                SyntaxKind::AnonymousClass | SyntaxKind::EnumConstantInitializer
                    if self.is_member(prev) =>
                {
                    self.find_inner_class_in_hierarchy(scope, name)
                }
                SyntaxKind::JavaFile => self.file_class(scope, name),
                _ => None,
            };
            if found.is_some() {
                return found;
            }
            prev = scope;
        }
        None
    }

    fn local_class_before(&self, block: NodeId, place: NodeId, name: &str) -> Option<NodeId> {
        let mut found = None;
        for &stmt in self.children(block) {
            if self.kind(stmt) == SyntaxKind::DeclarationStatement {
                if let Some(class) = self
                    .children_of_kind(stmt, SyntaxKind::Class)
                    .find(|&class| self.name(class).as_deref() == Some(name))
                {
                    found = Some(class);
                }
            }
            if stmt == place {
                break;
            }
        }
        found
    }

    fn type_parameter(&self, owner: NodeId, name: &str) -> Option<NodeId> {
        let list = self.find_child_by_role(owner, Role::TypeParameterList)?;
        self.children_of_kind(list, SyntaxKind::TypeParameter)
            .find(|&param| self.name(param).as_deref() == Some(name))
    }

    /// Top-level classes of the file, then single-type imports, then
    /// on-demand imports.
    fn file_class(&self, file: NodeId, name: &str) -> Option<NodeId> {
        if let Some(class) = self
            .classes(file)
            .into_iter()
            .find(|&class| self.name(class).as_deref() == Some(name))
        {
            return Some(class);
        }
        let imports = self.imports(file);
        let single_type = imports.iter().copied().find_map(|import| {
            if self.is_static_import(import) || self.is_on_demand(import) {
                return None;
            }
            let imported = self.import_name(import);
            let simple = imported.rsplit('.').next()?;
            if simple != name {
                return None;
            }
            self.find_class_by_qualified_name(file, &imported)
        });
        single_type.or_else(|| {
            imports.iter().copied().find_map(|import| {
                if self.is_static_import(import) || !self.is_on_demand(import) {
                    return None;
                }
                let qualified = format!("{}.{name}", self.import_name(import));
                self.find_class_by_qualified_name(file, &qualified)
            })
        })
    }

    pub(crate) fn find_class_by_qualified_name(
        &self,
        place: NodeId,
        qualified: &str,
    ) -> Option<NodeId> {
        let root = self.root_of(place);
        self.descendants(root).find(|&node| {
            self.kind(node) == SyntaxKind::Class
                && self.class_qualified_name(node).as_deref() == Some(qualified)
        })
    }

    /// Packages the file knows of: its own, the ones its imports name, and
    /// `java.lang`, together with every prefix of those.
    fn package_exists(&self, place: NodeId, package: &str) -> bool {
        let root = self.root_of(place);
        if self.kind(root) != SyntaxKind::JavaFile {
            return false;
        }
        let mut known = vec!["java.lang".to_string(), self.package_name(root)];
        for import in self.imports(root) {
            let name = self.import_name(import);
            let package_part = if self.is_on_demand(import) && !self.is_static_import(import) {
                Some(name.as_str())
            } else {
                name.rsplit_once('.').map(|(head, _)| head)
            };
            known.extend(package_part.map(str::to_string));
        }
        known.iter().any(|known| {
            known == package
                || known
                    .strip_prefix(package)
                    .map_or(false, |rest| rest.starts_with('.'))
        })
    }

    // --- hierarchy -----------------------------------------------------------

    /// In-tree declarations a class directly extends or implements.
    pub fn direct_supertypes(&self, class: NodeId) -> Vec<NodeId> {
        match self.kind(class) {
            SyntaxKind::AnonymousClass => self
                .find_child_by_role(class, Role::BaseClassReference)
                .and_then(|reference| self.resolve_class_reference(reference))
                .into_iter()
                .collect(),
            SyntaxKind::EnumConstantInitializer => self
                .parent(class)
                .and_then(|constant| self.parent(constant))
                .into_iter()
                .collect(),
            SyntaxKind::Class => [Role::ExtendsList, Role::ImplementsList]
                .into_iter()
                .filter_map(|role| self.find_child_by_role(class, role))
                .flat_map(|list| self.children_of_kind(list, SyntaxKind::JavaCodeReference))
                .filter_map(|reference| self.resolve_class_reference(reference))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// `class` followed by its in-tree supertypes, breadth first, each once.
    pub fn hierarchy(&self, class: NodeId) -> Vec<NodeId> {
        let mut classes = vec![class];
        let mut next = 0;
        while next < classes.len() {
            for supertype in self.direct_supertypes(classes[next]) {
                if !classes.contains(&supertype) {
                    classes.push(supertype);
                }
            }
            next += 1;
        }
        classes
    }

    pub fn find_field_in_hierarchy(&self, class: NodeId, name: &str) -> Option<NodeId> {
        if let Some(field) = self.find_field(class, name) {
            return Some(field);
        }
        self.hierarchy(class)
            .into_iter()
            .skip(1)
            .find_map(|c| self.find_field(c, name))
    }

    pub fn find_inner_class_in_hierarchy(&self, class: NodeId, name: &str) -> Option<NodeId> {
        if let Some(inner) = self.find_inner_class(class, name) {
            return Some(inner);
        }
        self.hierarchy(class)
            .into_iter()
            .skip(1)
            .find_map(|c| self.find_inner_class(c, name))
    }

    /// Methods named `name` in `class` and its supertypes; an override hides
    /// the method it overrides.
    pub fn find_methods_in_hierarchy(&self, class: NodeId, name: &str) -> Vec<NodeId> {
        let mut methods: Vec<NodeId> = Vec::new();
        let mut signatures: Vec<Vec<Option<JavaType>>> = Vec::new();
        for c in self.hierarchy(class) {
            for method in self.find_methods(c, name) {
                let signature = self.parameter_types(method);
                if !signatures.contains(&signature) {
                    signatures.push(signature);
                    methods.push(method);
                }
            }
        }
        methods
    }

    fn constructors(&self, class: NodeId) -> Vec<NodeId> {
        self.methods(class)
            .into_iter()
            .filter(|&method| self.is_constructor(method))
            .collect()
    }

    fn parameter_types(&self, method: NodeId) -> Vec<Option<JavaType>> {
        self.parameters(method)
            .into_iter()
            .map(|param| self.variable_java_type(param))
            .collect()
    }

    // --- method calls --------------------------------------------------------

    fn resolve_method_call(&self, call: NodeId, reference: NodeId) -> Vec<ResolvedElement> {
        let Some(name_token) = self.find_child_by_role(reference, Role::ReferenceName) else {
            return Vec::new();
        };
        let name = self.leaf_text(name_token);
        let candidates = match self.kind(name_token) {
            SyntaxKind::ThisKw => self
                .enclosing_class(call)
                .map(|class| self.constructors(class))
                .unwrap_or_default(),
            SyntaxKind::SuperKw => self
                .enclosing_class(call)
                .and_then(|class| self.super_class_type(class).class()?.declaration)
                .map(|class| self.constructors(class))
                .unwrap_or_default(),
            _ => match self.qualifier(reference) {
                Some(qualifier) => self
                    .qualifier_class(qualifier)
                    .map(|class| self.find_methods_in_hierarchy(class, name))
                    .unwrap_or_default(),
                None => self
                    .ancestors(call)
                    .skip(1)
                    .filter(|&n| tables::CLASS_BODIES.contains(self.kind(n)))
                    .map(|class| self.find_methods_in_hierarchy(class, name))
                    .find(|methods| !methods.is_empty())
                    .or_else(|| {
                        let file = self.root_of(call);
                        (self.kind(file) == SyntaxKind::JavaFile).then(|| {
                            self.static_imports_of(file, name)
                                .flat_map(|class| self.find_methods(class, name))
                                .collect()
                        })
                    })
                    .unwrap_or_default(),
            },
        };
        self.select_overloads(candidates, &self.arguments(call))
            .into_iter()
            .map(ResolvedElement::Method)
            .collect()
    }

    fn enclosing_class(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .skip(1)
            .find(|&n| self.kind(n) == SyntaxKind::Class)
    }

    /// Applicable by arity, then by argument types, then the most specific.
    fn select_overloads(&self, candidates: Vec<NodeId>, args: &[NodeId]) -> Vec<NodeId> {
        let by_arity: Vec<NodeId> = candidates
            .into_iter()
            .filter(|&method| self.accepts_arity(method, args.len()))
            .collect();
        if by_arity.len() <= 1 {
            return by_arity;
        }
        let arg_types: Vec<Option<JavaType>> =
            args.iter().map(|&arg| self.expression_type(arg)).collect();
        let by_type: Vec<NodeId> = by_arity
            .iter()
            .copied()
            .filter(|&method| self.accepts_argument_types(method, &arg_types))
            .collect();
        let pool = if by_type.is_empty() { by_arity } else { by_type };
        let most_specific: Vec<NodeId> = pool
            .iter()
            .copied()
            .filter(|&method| {
                pool.iter()
                    .all(|&other| other == method || self.is_more_specific(method, other))
            })
            .collect();
        if most_specific.is_empty() {
            pool
        } else {
            most_specific
        }
    }

    fn accepts_arity(&self, method: NodeId, count: usize) -> bool {
        let params = self.parameters(method).len();
        if self.is_varargs(method) {
            count + 1 >= params
        } else {
            count == params
        }
    }

    fn accepts_argument_types(&self, method: NodeId, args: &[Option<JavaType>]) -> bool {
        let params = self.parameter_types(method);
        let varargs = self.is_varargs(method);
        args.iter().enumerate().all(|(i, arg)| {
            let Some(arg) = arg else {
                return true;
            };
            let last = params.len().saturating_sub(1);
            let param = match params.get(i.min(last)) {
                Some(Some(param)) => param,
                Some(None) => return true,
                None => return false,
            };
            if varargs && i >= last {
                let whole_array = args.len() == params.len() && is_assignable(param, arg);
                whole_array || param.component().map_or(false, |c| is_assignable(c, arg))
            } else {
                is_assignable(param, arg)
            }
        })
    }

    fn is_more_specific(&self, method: NodeId, other: NodeId) -> bool {
        let mine = self.parameter_types(method);
        let theirs = self.parameter_types(other);
        mine.len() == theirs.len()
            && mine.iter().zip(&theirs).all(|(m, t)| match (m, t) {
                (Some(m), Some(t)) => is_assignable(t, m),
                _ => false,
            })
    }

    // --- code references -------------------------------------------------------

    fn resolve_code_reference(&self, reference: NodeId) -> Vec<ResolvedElement> {
        let Some(name) = self.reference_name(reference) else {
            return Vec::new();
        };
        let mut outermost = reference;
        while let Some(parent) = self
            .parent(outermost)
            .filter(|&p| self.kind(p) == SyntaxKind::JavaCodeReference)
        {
            outermost = parent;
        }
        let context = self.parent(outermost).map(|p| self.kind(p));
        let found = match context {
            Some(SyntaxKind::PackageStatement) => {
                let package = self.qualified_name(reference);
                self.package_exists(reference, &package)
                    .then(|| ResolvedElement::Package(package))
            }
            Some(SyntaxKind::ImportStatement | SyntaxKind::ImportStaticStatement) => {
                return self.resolve_imported_name(reference);
            }
            _ => match self.find_child_by_role(reference, Role::Qualifier) {
                None => self
                    .resolve_class(reference, &name)
                    .map(ResolvedElement::Class)
                    .or_else(|| {
                        self.package_exists(reference, &name)
                            .then(|| ResolvedElement::Package(name.to_string()))
                    }),
                Some(qualifier) => match self.resolve(qualifier) {
                    Some(ResolvedElement::Class(class)) => self
                        .find_inner_class_in_hierarchy(class, &name)
                        .map(ResolvedElement::Class),
                    Some(ResolvedElement::Package(package)) => {
                        let qualified = format!("{package}.{name}");
                        self.find_class_by_qualified_name(reference, &qualified)
                            .map(ResolvedElement::Class)
                            .or_else(|| {
                                self.package_exists(reference, &qualified)
                                    .then(|| ResolvedElement::Package(qualified))
                            })
                    }
                    _ => None,
                },
            },
        };
        found.into_iter().collect()
    }

    /// A name inside an import: a class in the tree, the members a static
    /// import names, or a package.
    fn resolve_imported_name(&self, reference: NodeId) -> Vec<ResolvedElement> {
        let qualified = self.qualified_name(reference);
        if let Some(class) = self.find_class_by_qualified_name(reference, &qualified) {
            return vec![ResolvedElement::Class(class)];
        }
        if let Some((class_name, member)) = qualified.rsplit_once('.') {
            if let Some(class) = self.find_class_by_qualified_name(reference, class_name) {
                if let Some(field) = self.find_field(class, member) {
                    return vec![ResolvedElement::Variable(field)];
                }
                let methods: Vec<ResolvedElement> = self
                    .find_methods(class, member)
                    .into_iter()
                    .map(ResolvedElement::Method)
                    .collect();
                if !methods.is_empty() {
                    return methods;
                }
            }
        }
        if self.package_exists(reference, &qualified) {
            return vec![ResolvedElement::Package(qualified)];
        }
        Vec::new()
    }
}

/// Assignment conversion, restricted to what the tree can decide.
fn is_assignable(to: &JavaType, from: &JavaType) -> bool {
    if to == from {
        return true;
    }
    match (to, from) {
        (JavaType::Primitive(t), JavaType::Primitive(f)) => is_widening(*f, *t),
        (JavaType::Primitive(t), JavaType::Class(_)) => from
            .unboxed()
            .map_or(false, |f| f == *t || is_widening(f, *t)),
        (JavaType::Class(_) | JavaType::Array(_), JavaType::Null) => true,
        (JavaType::Class(t), JavaType::Primitive(f)) => {
            t.name == "java.lang.Object" || to.unboxed() == Some(*f)
        }
        (JavaType::Class(t), JavaType::Class(f)) => {
            t.name == f.name || t.name == "java.lang.Object" || f.declaration.is_none()
        }
        (JavaType::Class(t), JavaType::Array(_)) => t.name == "java.lang.Object",
        (JavaType::Array(t), JavaType::Array(f)) => is_assignable(t, f),
        _ => false,
    }
}

fn is_widening(from: PrimitiveType, to: PrimitiveType) -> bool {
    use PrimitiveType::*;
    matches!(
        (from, to),
        (Byte, Short | Int | Long | Float | Double)
            | (Short | Char, Int | Long | Float | Double)
            | (Int, Long | Float | Double)
            | (Long, Float | Double)
            | (Float, Double)
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn references(tree: &SyntaxTree, text: &str) -> Vec<NodeId> {
        tree.descendants(tree.root())
            .filter(|&n| {
                matches!(
                    tree.kind(n),
                    SyntaxKind::ReferenceExpression | SyntaxKind::JavaCodeReference
                ) && tree.text(n).trim() == text
            })
            .collect()
    }

    fn reference(tree: &SyntaxTree, text: &str) -> NodeId {
        references(tree, text)
            .first()
            .copied()
            .unwrap_or_else(|| panic!("no reference `{text}`"))
    }

    fn declaration(tree: &SyntaxTree, kind: SyntaxKind, name: &str) -> NodeId {
        tree.descendants(tree.root())
            .find(|&n| tree.kind(n) == kind && tree.name(n).as_deref() == Some(name))
            .unwrap_or_else(|| panic!("no {kind:?} `{name}`"))
    }

    #[test]
    fn locals_shadow_fields() {
        let tree = SyntaxTree::parse(
            "class A { int x; void m(int y) { int x = 1; x = y; } void n() { x = 2; } }",
        );
        let refs = references(&tree, "x");
        let local = declaration(&tree, SyntaxKind::LocalVariable, "x");
        let field = declaration(&tree, SyntaxKind::Field, "x");
        assert_eq!(tree.resolve(refs[0]), Some(ResolvedElement::Variable(local)));
        assert_eq!(tree.resolve(refs[1]), Some(ResolvedElement::Variable(field)));
        let param = declaration(&tree, SyntaxKind::Parameter, "y");
        assert_eq!(
            tree.resolve(reference(&tree, "y")),
            Some(ResolvedElement::Variable(param))
        );
    }

    #[test]
    fn locals_are_visible_only_after_their_declaration() {
        let tree = SyntaxTree::parse("class A { int x; void m() { x = 0; int x = 1; } }");
        let field = declaration(&tree, SyntaxKind::Field, "x");
        assert_eq!(
            tree.resolve(reference(&tree, "x")),
            Some(ResolvedElement::Variable(field))
        );
    }

    #[test]
    fn loop_catch_and_resource_variables() {
        let tree = SyntaxTree::parse(
            "class A { void m(int[] xs) { for (int i = 0; i < 3; i++) {} for (int x : xs) { use(x); } \
             try (R r = open()) { r.close(); } catch (E e) { e.print(); } } }",
        );
        let i = declaration(&tree, SyntaxKind::LocalVariable, "i");
        assert_eq!(
            tree.resolve(reference(&tree, "i")),
            Some(ResolvedElement::Variable(i))
        );
        let x = declaration(&tree, SyntaxKind::Parameter, "x");
        assert_eq!(
            tree.resolve(reference(&tree, "x")),
            Some(ResolvedElement::Variable(x))
        );
        let r = declaration(&tree, SyntaxKind::ResourceVariable, "r");
        assert_eq!(
            tree.resolve(reference(&tree, "r")),
            Some(ResolvedElement::Variable(r))
        );
        let e = declaration(&tree, SyntaxKind::Parameter, "e");
        assert_eq!(
            tree.resolve(reference(&tree, "e")),
            Some(ResolvedElement::Variable(e))
        );
    }

    #[test]
    fn variable_then_class_then_package() {
        let tree = SyntaxTree::parse(
            "import java.util.List;\nclass A { static class B { static int k; } void m() { Object o = java; int v = B.k; } }",
        );
        assert_eq!(
            tree.resolve(reference(&tree, "java")),
            Some(ResolvedElement::Package("java".to_string()))
        );
        let b = declaration(&tree, SyntaxKind::Class, "B");
        assert_eq!(
            tree.resolve(reference(&tree, "B")),
            Some(ResolvedElement::Class(b))
        );
        let k = declaration(&tree, SyntaxKind::Field, "k");
        assert_eq!(
            tree.resolve(reference(&tree, "B.k")),
            Some(ResolvedElement::Variable(k))
        );

        let shadowed = SyntaxTree::parse("class A { class B {} void m() { int B = 0; Object o = B; } }");
        let local = declaration(&shadowed, SyntaxKind::LocalVariable, "B");
        let uses = references(&shadowed, "B");
        assert_eq!(
            shadowed.resolve(*uses.last().unwrap()),
            Some(ResolvedElement::Variable(local))
        );
    }

    #[test]
    fn fields_through_qualifiers_and_supertypes() {
        let tree = SyntaxTree::parse(
            "class Base { int inherited; }\nclass A extends Base { A other; void m() { int v = other.inherited + this.inherited; } }",
        );
        let field = declaration(&tree, SyntaxKind::Field, "inherited");
        assert_eq!(
            tree.resolve(reference(&tree, "other.inherited")),
            Some(ResolvedElement::Variable(field))
        );
        assert_eq!(
            tree.resolve(reference(&tree, "this.inherited")),
            Some(ResolvedElement::Variable(field))
        );
    }

    #[test]
    fn overloads_pick_the_most_specific() {
        let tree = SyntaxTree::parse(
            "class A { void f(int a) {} void f(long a) {} void f(String s) {} void g() { f(1); f(\"s\"); f(1L); } }",
        );
        let methods: Vec<NodeId> = tree
            .descendants(tree.root())
            .filter(|&n| tree.kind(n) == SyntaxKind::Method && tree.name(n).as_deref() == Some("f"))
            .collect();
        let calls = references(&tree, "f");
        assert_eq!(tree.advanced_resolve(calls[0]), Some(ResolvedElement::Method(methods[0])));
        assert_eq!(tree.advanced_resolve(calls[1]), Some(ResolvedElement::Method(methods[2])));
        assert_eq!(tree.advanced_resolve(calls[2]), Some(ResolvedElement::Method(methods[1])));
    }

    #[test]
    fn ambiguous_calls_have_no_advanced_result() {
        let tree = SyntaxTree::parse(
            "class A { void f(Integer a) {} void f(String a) {} void g() { f(null); } }",
        );
        let call = reference(&tree, "f");
        assert_eq!(tree.multi_resolve(call).len(), 2);
        assert!(tree.resolve(call).is_some());
        assert_eq!(tree.advanced_resolve(call), None);
    }

    #[test]
    fn this_and_super_calls_resolve_to_constructors() {
        let tree = SyntaxTree::parse(
            "class B { B(int x) {} }\nclass A extends B { A() { this(1); } A(int x) { super(x); } }",
        );
        let b_ctor = declaration(&tree, SyntaxKind::Method, "B");
        let a_ctors: Vec<NodeId> = tree
            .descendants(tree.root())
            .filter(|&n| tree.kind(n) == SyntaxKind::Method && tree.name(n).as_deref() == Some("A"))
            .collect();
        assert_eq!(
            tree.resolve(reference(&tree, "this")),
            Some(ResolvedElement::Method(a_ctors[1]))
        );
        assert_eq!(
            tree.resolve(reference(&tree, "super")),
            Some(ResolvedElement::Method(b_ctor))
        );
    }

    #[test]
    fn case_labels_prefer_enum_constants() {
        let tree = SyntaxTree::parse(
            "enum E { A, B }\nclass C { static int A; void m(E e) { switch (e) { case A: break; } int v = A; } }",
        );
        let constant = declaration(&tree, SyntaxKind::EnumConstant, "A");
        let field = declaration(&tree, SyntaxKind::Field, "A");
        let uses = references(&tree, "A");
        assert_eq!(tree.resolve(uses[0]), Some(ResolvedElement::Variable(constant)));
        assert_eq!(tree.resolve(uses[1]), Some(ResolvedElement::Variable(field)));
    }

    #[test]
    fn incomplete_code_retries_as_a_plain_name() {
        let tree = SyntaxTree::parse("class A { int foo; void m() { foo(); } }");
        let call = reference(&tree, "foo");
        assert_eq!(tree.resolve(call), None);
        let field = declaration(&tree, SyntaxKind::Field, "foo");
        assert_eq!(
            tree.resolve_incomplete(call),
            vec![ResolvedElement::Variable(field)]
        );
    }

    #[test]
    fn code_references_in_types_and_imports() {
        let tree = SyntaxTree::parse(
            "package p;\nimport p.Outer.Inner;\nclass Outer { static class Inner {} }\nclass A<T> extends Outer { Inner i; T t; Missing m; }",
        );
        let inner = declaration(&tree, SyntaxKind::Class, "Inner");
        let refs = references(&tree, "Inner");
        assert_eq!(tree.resolve(refs[0]), Some(ResolvedElement::Class(inner)));
        assert_eq!(
            tree.resolve(reference(&tree, "p.Outer.Inner")),
            Some(ResolvedElement::Class(inner))
        );
        assert_eq!(
            tree.resolve(reference(&tree, "p")),
            Some(ResolvedElement::Package("p".to_string()))
        );
        let t = declaration(&tree, SyntaxKind::TypeParameter, "T");
        assert_eq!(tree.resolve(reference(&tree, "T")), Some(ResolvedElement::Class(t)));
        assert_eq!(tree.resolve(reference(&tree, "Missing")), None);
    }

    #[test]
    fn cyclic_inheritance_terminates() {
        let tree = SyntaxTree::parse("class A extends B {}\nclass B extends A { void m() { x = 1; } }");
        assert_eq!(tree.resolve(reference(&tree, "x")), None);
    }
}
