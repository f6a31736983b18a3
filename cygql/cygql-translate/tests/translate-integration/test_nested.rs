use cygql_macros::test;
use cygql_test_utils::expect_eq;
use indoc::indoc;
use serde_json::json;

use crate::{TranslateMutation, arguments, nested_schema};

fn customers() -> serde_json::Value {
    json!({
        "data": [{
            "id": "c1",
            "name": "Ada",
            "orders": [{
                "id": "o1",
                "items": [{ "sku": "s1" }, { "sku": "s2" }]
            }]
        }]
    })
}

#[test]
fn root_unwind_is_reused() {
    let schema = nested_schema(json!({}));

    expect_eq!(
        expected = indoc! {"
            UNWIND $data AS CustomerInput
            MERGE (c:Customer {id: CustomerInput.id})
            SET c.name = CustomerInput.name
            WITH c, CustomerInput
            CALL {
              WITH *
              UNWIND CustomerInput.orders AS OrderInput
              WITH c, OrderInput
              MERGE (o:Order {id: OrderInput.id})
              MERGE (c)-[:PLACED]->(o)
              WITH o, OrderInput AS _OrderInput
              CALL {
                WITH *
                UNWIND _OrderInput.items AS ItemInput
                MERGE (i:Item {sku: ItemInput.sku})
                MERGE (o)-[:CONTAINS]->(i)
                RETURN COUNT(*) AS _data_orders_items
              }
              RETURN COUNT(*) AS _data_orders
            }
            RETURN c"
        },
        actual = schema.nested_statement("MergeCustomers", customers())
    );
}

#[test]
fn root_list_is_unwound_twice() {
    let schema = nested_schema(json!({}));

    expect_eq!(
        expected = indoc! {"
            MATCH (c:Customer)
            WHERE c.id IN [customer IN $data | customer.id]
            CALL {
              WITH *
              UNWIND $data AS _CustomerInput
              UNWIND _CustomerInput.orders AS OrderInput
              WITH c, OrderInput
              MERGE (o:Order {id: OrderInput.id})
              MERGE (c)-[:PLACED]->(o)
              WITH o, OrderInput AS _OrderInput
              CALL {
                WITH *
                UNWIND _OrderInput.items AS ItemInput
                MERGE (i:Item {sku: ItemInput.sku})
                MERGE (o)-[:CONTAINS]->(i)
                RETURN COUNT(*) AS _data_orders_items
              }
              RETURN COUNT(*) AS _data_orders
            }
            RETURN c"
        },
        actual = schema.nested_statement("ImportCustomers", customers())
    );
}

#[test]
fn arguments_become_parameters() {
    let schema = nested_schema(json!({}));
    let query = schema
        .translate_mutation("ImportCustomers", customers())
        .unwrap();

    expect_eq!(expected = arguments(customers()), actual = query.params);
}

#[test]
fn plain_input_objects_are_addressed_by_path() {
    let schema = nested_schema(json!({}));
    let args = json!({
        "customer": {
            "id": "c1",
            "profile": { "tags": [{ "name": "vip" }] }
        }
    });

    expect_eq!(
        expected = indoc! {"
            MERGE (c:Customer {id: $customer.id})
            CALL {
              WITH *
              UNWIND $customer.profile.tags AS TagInput
              MERGE (t:Tag {name: TagInput.name})
              MERGE (c)-[:TAGGED]->(t)
              RETURN COUNT(*) AS _customer_profile_tags
            }
            RETURN c"
        },
        actual = schema.nested_statement("SaveCustomer", args)
    );
}

#[test]
fn absent_nested_input_leaves_statement_alone() {
    let schema = nested_schema(json!({}));
    let args = json!({ "customer": { "id": "c1", "orders": [] } });

    expect_eq!(
        expected = "MERGE (c:Customer {id: $customer.id})\nRETURN c",
        actual = schema.nested_statement("SaveCustomer", args)
    );
}

#[test]
fn missing_export_clause_is_synthesized() {
    let schema = nested_schema(json!({}));
    let args = json!({
        "warehouse": {
            "id": "w1",
            "shipments": [{ "id": "s1", "parcels": [{ "weight": 2.5 }] }]
        }
    });

    expect_eq!(
        expected = indoc! {"
            MERGE (w:Warehouse {id: $warehouse.id})
            CALL {
              WITH *
              UNWIND $warehouse.shipments AS ShipmentInput
              MERGE (w)-[:SENDS]->(s:Shipment {id: ShipmentInput.id})
              WITH *, ShipmentInput AS _ShipmentInput
              CALL {
                WITH *
                UNWIND _ShipmentInput.parcels AS ParcelInput
                MERGE (s)-[:HOLDS]->(:Parcel {weight: ParcelInput.weight})
                RETURN COUNT(*) AS _warehouse_shipments_parcels
              }
              RETURN COUNT(*) AS _warehouse_shipments
            }"
        },
        actual = schema.nested_statement("SaveWarehouse", args)
    );
}

#[test]
fn sibling_blocks_follow_field_order() {
    let schema = nested_schema(json!({}));
    let args = json!({
        "warehouse": {
            "id": "w1",
            "docks": [{ "doors": [{ "number": 1 }] }, { "doors": [] }],
            "manager": { "name": "Ada" }
        }
    });

    expect_eq!(
        expected = indoc! {"
            MERGE (w:Warehouse {id: $warehouse.id})
            CALL {
              WITH *
              WITH *, $warehouse.manager AS ManagerInput
              MERGE (w)-[:MANAGED_BY]->(:Person {name: ManagerInput.name})
              RETURN COUNT(*) AS _warehouse_manager
            }
            CALL {
              WITH *
              UNWIND $warehouse.docks AS _DockInput
              UNWIND _DockInput.doors AS DoorInput
              MERGE (w)-[:HAS_DOOR]->(:Door {number: DoorInput.number})
              RETURN COUNT(*) AS _warehouse_docks_doors
            }"
        },
        actual = schema.nested_statement("SaveWarehouse", args)
    );
}

#[test]
fn block_comments_are_kept_but_not_parsed() {
    let schema = nested_schema(json!({}));
    let args = json!({
        "data": [{ "id": "s1", "items": [{ "sku": "a" }, { "sku": "b" }] }]
    });

    expect_eq!(
        expected = indoc! {"
            UNWIND $data AS ShelfInput /* one node per input */
            MERGE (s:Shelf {id: ShelfInput.id})
            WITH s, ShelfInput /* carried */
            CALL {
              WITH *
              UNWIND ShelfInput.items AS ItemInput
              /* never RETURN from here */
              MERGE (s)-[:STOCKS]->(:Item {sku: ItemInput.sku})
              RETURN COUNT(*) AS _data_items
            }
            RETURN s"
        },
        actual = schema.nested_statement("SaveShelves", args)
    );
}
