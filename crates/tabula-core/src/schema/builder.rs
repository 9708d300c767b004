use super::{
    BelongsTo, Constructor, Field, FieldId, FieldName, FieldPrimitive, FieldTy, ForeignKey,
    HasMany, HasOne, Model, ModelId, PrimaryKey, Property, Schema,
};
use crate::{value::Type, Error, Result, Value};

use indexmap::IndexMap;

/// Declares the models of a [`Schema`].
///
/// Models reference each other by name, so declaration order does not
/// matter. Names are resolved when [`build`](Builder::build) runs.
#[derive(Debug, Default)]
pub struct Builder {
    models: Vec<ModelBuilder>,
}

/// Declares a single model. Created with [`Model::builder`].
#[derive(Debug)]
pub struct ModelBuilder {
    name: String,
    fields: Vec<FieldDecl>,
    defaults: Vec<(String, Value)>,
    properties: Vec<Property>,
    parent: Option<String>,
    discriminator: Option<String>,
    identity: Option<Value>,
    constructor: Option<Constructor>,
}

#[derive(Debug)]
struct FieldDecl {
    name: String,
    column_name: Option<String>,
    kind: FieldDeclKind,
    primary_key: bool,
}

#[derive(Debug)]
enum FieldDeclKind {
    Column(Type),
    ForeignKey { target: String },
    BelongsTo { target: String, column: String },
    HasMany { target: String },
    HasOne { target: String },
}

/// Used to track state during the build process
struct BuildSchema<'a> {
    decls: &'a [ModelBuilder],

    /// Maps model names to identifiers. Identifiers are reserved before any
    /// model is built.
    lookup: IndexMap<&'a str, ModelId>,

    /// Models as they are built. Parents are always built before children.
    models: IndexMap<ModelId, Model>,

    /// Models whose build is in progress, used to detect inheritance cycles
    visiting: Vec<ModelId>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, model: ModelBuilder) -> Self {
        self.models.push(model);
        self
    }

    pub fn build(self) -> Result<Schema> {
        let mut lookup = IndexMap::new();

        for (index, decl) in self.models.iter().enumerate() {
            if lookup.insert(decl.name.as_str(), ModelId(index)).is_some() {
                return Err(Error::invalid_schema(format!(
                    "duplicate model `{}`",
                    decl.name
                )));
            }
        }

        let mut build = BuildSchema {
            decls: &self.models,
            lookup,
            models: IndexMap::new(),
            visiting: vec![],
        };

        for index in 0..self.models.len() {
            build.build_model(ModelId(index))?;
        }

        let mut models = build.models;
        models.sort_keys();

        Ok(Schema { models })
    }
}

impl Model {
    pub fn builder(name: impl Into<String>) -> ModelBuilder {
        ModelBuilder {
            name: name.into(),
            fields: vec![],
            defaults: vec![],
            properties: vec![],
            parent: None,
            discriminator: None,
            identity: None,
            constructor: None,
        }
    }
}

impl ModelBuilder {
    /// Declares a primary-key column.
    pub fn primary_key(mut self, name: impl Into<String>, ty: impl Into<Type>) -> Self {
        self.push(name.into(), None, FieldDeclKind::Column(ty.into()), true);
        self
    }

    pub fn column(mut self, name: impl Into<String>, ty: impl Into<Type>) -> Self {
        self.push(name.into(), None, FieldDeclKind::Column(ty.into()), false);
        self
    }

    /// Declares a column whose underlying name differs from the attribute
    /// name.
    pub fn column_named(
        mut self,
        name: impl Into<String>,
        column_name: impl Into<String>,
        ty: impl Into<Type>,
    ) -> Self {
        self.push(
            name.into(),
            Some(column_name.into()),
            FieldDeclKind::Column(ty.into()),
            false,
        );
        self
    }

    /// Sets the value a field takes when a record is instantiated. The field
    /// may be inherited.
    pub fn default(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.push((name.into(), value.into()));
        self
    }

    /// Declares a column holding the primary key of `target`. The column type
    /// is the target's key type.
    pub fn foreign_key(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        let target = target.into();
        self.push(name.into(), None, FieldDeclKind::ForeignKey { target }, false);
        self
    }

    /// Declares a to-one relation loaded through `column`. The column is
    /// declared as a foreign key unless this model already declares it.
    pub fn belongs_to(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        let target = target.into();
        let column = column.into();

        if !self.fields.iter().any(|field| field.name == column) {
            let kind = FieldDeclKind::ForeignKey {
                target: target.clone(),
            };
            self.push(column.clone(), None, kind, false);
        }

        self.push(
            name.into(),
            None,
            FieldDeclKind::BelongsTo { target, column },
            false,
        );
        self
    }

    pub fn has_many(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        let target = target.into();
        self.push(name.into(), None, FieldDeclKind::HasMany { target }, false);
        self
    }

    pub fn has_one(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        let target = target.into();
        self.push(name.into(), None, FieldDeclKind::HasOne { target }, false);
        self
    }

    /// Declares a computed, read-only attribute.
    pub fn property(
        mut self,
        name: impl Into<String>,
        ty: impl Into<Type>,
        compute: impl Fn(&crate::Record) -> Value + Send + Sync + 'static,
    ) -> Self {
        let property = Property::new(name, ty, compute);
        self.properties.retain(|existing| existing.name != property.name);
        self.properties.push(property);
        self
    }

    /// Makes this model a subtype of `parent`, inheriting its fields,
    /// properties, discriminator and constructor.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Marks the column carrying the subtype tag. Resolved by column name.
    pub fn discriminator(mut self, column_name: impl Into<String>) -> Self {
        self.discriminator = Some(column_name.into());
        self
    }

    /// The discriminator value identifying this model.
    pub fn identity(mut self, value: impl Into<Value>) -> Self {
        self.identity = Some(value.into());
        self
    }

    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    fn push(
        &mut self,
        name: String,
        column_name: Option<String>,
        kind: FieldDeclKind,
        primary_key: bool,
    ) {
        let decl = FieldDecl {
            name,
            column_name,
            kind,
            primary_key,
        };

        match self.fields.iter_mut().find(|field| field.name == decl.name) {
            Some(existing) => *existing = decl,
            None => self.fields.push(decl),
        }
    }
}

impl<'a> BuildSchema<'a> {
    fn build_model(&mut self, id: ModelId) -> Result<()> {
        if self.models.contains_key(&id) {
            return Ok(());
        }

        let decls = self.decls;
        let decl = &decls[id.0];

        if self.visiting.contains(&id) {
            return Err(Error::invalid_schema(format!(
                "inheritance cycle through `{}`",
                decl.name
            )));
        }

        self.visiting.push(id);

        let parent = match &decl.parent {
            Some(name) => {
                let parent = self.lookup_model(name, &decl.name)?;
                self.build_model(parent)?;
                Some(parent)
            }
            None => None,
        };

        let model = self.assemble(id, decl, parent)?;

        self.visiting.pop();
        self.models.insert(id, model);

        Ok(())
    }

    fn assemble(&self, id: ModelId, decl: &ModelBuilder, parent: Option<ModelId>) -> Result<Model> {
        let mut fields: Vec<Field> = vec![];
        let mut primary_key = PrimaryKey::default();
        let mut properties = vec![];
        let mut discriminator = None;
        let mut constructor = None;

        // Inherited fields keep their index
        if let Some(parent) = parent {
            let parent = &self.models[&parent];

            fields = parent
                .fields
                .iter()
                .map(|field| rebase_field(field, id))
                .collect();
            primary_key.fields = parent
                .primary_key
                .fields
                .iter()
                .map(|field| field.rebase(id))
                .collect();
            properties = parent.properties.clone();
            discriminator = parent.discriminator.map(|field| field.rebase(id));
            constructor = parent.constructor.clone();
        }

        // A model declaring its own key overrides the inherited one
        if decl.fields.iter().any(|field| field.primary_key) {
            for field in &mut fields {
                field.primary_key = false;
            }
            primary_key.fields.clear();
        }

        for field_decl in &decl.fields {
            let ty = self.field_ty(field_decl, &decl.name)?;
            let index = match fields
                .iter()
                .position(|field| field.name.app_name == field_decl.name)
            {
                Some(index) => index,
                None => fields.len(),
            };

            let field = Field {
                id: id.field(index),
                name: FieldName {
                    app_name: field_decl.name.clone(),
                    column_name: field_decl.column_name.clone(),
                },
                ty,
                primary_key: field_decl.primary_key,
                default: None,
            };

            if index == fields.len() {
                fields.push(field);
            } else {
                fields[index] = field;
            }

            if field_decl.primary_key {
                primary_key.fields.push(id.field(index));
            }
        }

        link_belongs_to(&mut fields, decl)?;

        for (name, value) in &decl.defaults {
            let Some(field) = fields.iter_mut().find(|field| field.name.app_name == *name) else {
                return Err(Error::invalid_schema(format!(
                    "default for unknown field `{}.{name}`",
                    decl.name
                )));
            };
            field.default = Some(value.clone());
        }

        for property in &decl.properties {
            properties.retain(|existing: &Property| existing.name != property.name);
            properties.push(property.clone());
        }

        if let Some(column_name) = &decl.discriminator {
            let Some(field) = fields
                .iter()
                .find(|field| field.name.column_name() == column_name)
            else {
                return Err(Error::invalid_schema(format!(
                    "discriminator column `{column_name}` not found on `{}`",
                    decl.name
                )));
            };
            discriminator = Some(field.id);
        }

        if decl.identity.is_some() && discriminator.is_none() {
            return Err(Error::invalid_schema(format!(
                "`{}` declares a polymorphic identity outside a polymorphic hierarchy",
                decl.name
            )));
        }

        if primary_key.fields.is_empty() {
            return Err(Error::invalid_schema(format!(
                "`{}` has no primary key",
                decl.name
            )));
        }

        if decl.constructor.is_some() {
            constructor = decl.constructor.clone();
        }

        Ok(Model {
            id,
            name: decl.name.clone(),
            fields,
            primary_key,
            properties,
            parent,
            discriminator,
            identity: decl.identity.clone(),
            constructor,
        })
    }

    fn field_ty(&self, field: &FieldDecl, model: &str) -> Result<FieldTy> {
        Ok(match &field.kind {
            FieldDeclKind::Column(ty) => FieldTy::Primitive(FieldPrimitive {
                ty: ty.clone(),
                foreign_key: None,
            }),
            FieldDeclKind::ForeignKey { target } => {
                let target_id = self.lookup_model(target, model)?;
                FieldTy::Primitive(FieldPrimitive {
                    ty: self.primary_key_ty(target_id)?,
                    foreign_key: Some(ForeignKey {
                        target: target_id,
                        relation: None,
                    }),
                })
            }
            FieldDeclKind::BelongsTo { target, .. } => FieldTy::BelongsTo(BelongsTo {
                target: self.lookup_model(target, model)?,
                foreign_key: FieldId::placeholder(),
            }),
            FieldDeclKind::HasMany { target } => FieldTy::HasMany(HasMany {
                target: self.lookup_model(target, model)?,
            }),
            FieldDeclKind::HasOne { target } => FieldTy::HasOne(HasOne {
                target: self.lookup_model(target, model)?,
            }),
        })
    }

    /// The key type of a model, read from the declarations so that targets
    /// need not be built yet.
    fn primary_key_ty(&self, id: ModelId) -> Result<Type> {
        let mut curr = id;

        // Bounded by the model count so a parent cycle cannot loop forever
        for _ in 0..self.decls.len() {
            let decl = &self.decls[curr.0];

            if let Some(pk) = decl.fields.iter().find(|field| field.primary_key) {
                return match &pk.kind {
                    FieldDeclKind::Column(ty) => Ok(ty.clone()),
                    FieldDeclKind::ForeignKey { target } => {
                        let target = self.lookup_model(target, &decl.name)?;
                        self.primary_key_ty(target)
                    }
                    _ => Err(Error::invalid_schema(format!(
                        "primary key of `{}` must be a column",
                        decl.name
                    ))),
                };
            }

            match &decl.parent {
                Some(parent) => curr = self.lookup_model(parent, &decl.name)?,
                None => break,
            }
        }

        Err(Error::invalid_schema(format!(
            "`{}` has no primary key",
            self.decls[id.0].name
        )))
    }

    fn lookup_model(&self, name: &str, referrer: &str) -> Result<ModelId> {
        self.lookup.get(name).copied().ok_or_else(|| {
            Error::invalid_schema(format!("unknown model `{name}` referenced by `{referrer}`"))
        })
    }
}

fn rebase_field(field: &Field, model: ModelId) -> Field {
    let mut field = field.clone();
    field.id = field.id.rebase(model);

    match &mut field.ty {
        FieldTy::Primitive(primitive) => {
            if let Some(foreign_key) = &mut primitive.foreign_key {
                foreign_key.relation = foreign_key.relation.map(|relation| relation.rebase(model));
            }
        }
        FieldTy::BelongsTo(belongs_to) => {
            belongs_to.foreign_key = belongs_to.foreign_key.rebase(model);
        }
        FieldTy::HasMany(_) | FieldTy::HasOne(_) => {}
    }

    field
}

/// Pairs each `BelongsTo` relation with its key column, in both directions.
/// Inherited relations are already paired; their columns regain the key
/// metadata if the model redeclared them.
fn link_belongs_to(fields: &mut [Field], decl: &ModelBuilder) -> Result<()> {
    for index in 0..fields.len() {
        let FieldTy::BelongsTo(belongs_to) = &fields[index].ty else {
            continue;
        };

        let relation = fields[index].id;
        let target = belongs_to.target;

        let column = if belongs_to.foreign_key == FieldId::placeholder() {
            let column_name = decl.fields.iter().find_map(|field| match &field.kind {
                FieldDeclKind::BelongsTo { column, .. } if field.name == fields[index].name.app_name => {
                    Some(column.as_str())
                }
                _ => None,
            });

            fields.iter().position(|field| {
                field.is_column() && Some(field.name.app_name.as_str()) == column_name
            })
        } else {
            Some(belongs_to.foreign_key.index)
        };

        let Some(column) = column else {
            return Err(Error::invalid_schema(format!(
                "relation `{}.{}` has no key column",
                decl.name, fields[index].name.app_name
            )));
        };

        let column_id = fields[column].id;

        match fields[column].ty.as_primitive_mut() {
            Some(primitive) => {
                primitive.foreign_key = Some(ForeignKey {
                    target,
                    relation: Some(relation),
                });
            }
            None => {
                return Err(Error::invalid_schema(format!(
                    "relation `{}.{}` has no key column",
                    decl.name, fields[index].name.app_name
                )));
            }
        }

        if let FieldTy::BelongsTo(belongs_to) = &mut fields[index].ty {
            belongs_to.foreign_key = column_id;
        }
    }

    Ok(())
}
