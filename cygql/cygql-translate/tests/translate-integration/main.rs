use cygql_ast::OperationKind;
use cygql_augment::{AugmentationConfig, AugmentedSchema, augment_schema};
use cygql_test_utils::fixtures::NESTED_MUTATIONS_SDL;
use cygql_translate::{CypherQuery, NestedMutationTranslator, TranslateError};
use serde_json::{Map, Value};

mod test_errors;
mod test_nested;

fn nested_schema(config: Value) -> AugmentedSchema {
    let config = AugmentationConfig::from_json(config).unwrap();
    match augment_schema(NESTED_MUTATIONS_SDL, &config) {
        Ok(schema) => schema,
        Err(error) => panic!("augmentation failed: {error}"),
    }
}

fn arguments(args: Value) -> Map<String, Value> {
    match args {
        Value::Object(map) => map,
        other => panic!("arguments must be an object, was {other}"),
    }
}

trait TranslateMutation {
    fn translate_mutation(&self, mutation: &str, args: Value) -> Result<CypherQuery, TranslateError>;

    fn nested_statement(&self, mutation: &str, args: Value) -> String {
        match self.translate_mutation(mutation, args) {
            Ok(query) => query.statement,
            Err(error) => panic!("translation failed: {error}"),
        }
    }
}

impl TranslateMutation for AugmentedSchema {
    fn translate_mutation(&self, mutation: &str, args: Value) -> Result<CypherQuery, TranslateError> {
        let Some(field) = self.operation_field(OperationKind::Mutation, mutation) else {
            panic!("no mutation named `{mutation}`");
        };
        NestedMutationTranslator::new(self).translate(field, &arguments(args))
    }
}
