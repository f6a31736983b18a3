//! Schemas shared between the test suites.

use indoc::indoc;

/// The smallest useful node type.
pub const USER_SDL: &str = indoc! {r#"
    type User {
      id: ID! @id
      name: String
    }
"#};

/// Movies, genres and users, with an anonymous relation, a relationship
/// type and a reflexive relationship type.
pub const MOVIES_SDL: &str = indoc! {r#"
    type Movie {
      movieId: ID!
      title: String
      year: Int
      imdbRating: Float
      released: DateTime
      location: Point
      tags: [String]
      genres: [Genre] @relation(name: "IN_GENRE", direction: OUT)
      ratings: [Rated]
      similar(first: Int = 3): [Movie] @cypher(statement: "MATCH (this)--(:Genre)--(o:Movie) RETURN o")
    }

    type Genre {
      name: String @id
      movies: [Movie] @relation(name: "IN_GENRE", direction: IN)
    }

    type User {
      userId: ID!
      name: String
      rated: [Rated]
      friends: [FriendOf]
    }

    type Rated @relation(name: "RATED") {
      from: User
      to: Movie
      rating: Float
      created: DateTime
    }

    type FriendOf @relation(name: "FRIEND_OF") {
      from: User
      to: User
      since: Int
    }
"#};

/// Every property category on one type.
pub const PROPERTIES_SDL: &str = indoc! {r#"
    enum Color {
      RED
      GREEN
    }

    scalar Url

    type Thing {
      id: ID!
      name: String
      count: Int
      weight: Float
      active: Boolean
      color: Color
      homepage: Url
      time: Time
      date: Date
      datetime: DateTime
      localtime: LocalTime
      localdatetime: LocalDateTime
      location: Point
      scores: [Int]
    }
"#};

/// `@cypher` mutations taking input objects whose fields carry `@cypher`
/// statements of their own.
pub const NESTED_MUTATIONS_SDL: &str = indoc! {r#"
    type Customer {
      id: ID! @id
      name: String
    }

    type Warehouse {
      id: ID! @id
    }

    type Shelf {
      id: ID! @id
    }

    input CustomerInput {
      id: ID!
      name: String
      profile: ProfileInput
      orders: [OrderInput] @cypher(statement: """
        WITH c
        MERGE (o:Order {id: OrderInput.id})
        MERGE (c)-[:PLACED]->(o)
        WITH o
      """)
    }

    input ProfileInput {
      tags: [TagInput] @cypher(statement: """
        MERGE (t:Tag {name: TagInput.name})
        MERGE (c)-[:TAGGED]->(t)
      """)
    }

    input TagInput {
      name: String!
    }

    input OrderInput {
      id: ID!
      items: [ItemInput] @cypher(statement: """
        MERGE (i:Item {sku: ItemInput.sku})
        MERGE (o)-[:CONTAINS]->(i)
      """)
    }

    input ItemInput {
      sku: String!
    }

    input WarehouseInput {
      id: ID!
      manager: ManagerInput @cypher(statement: """
        MERGE (w)-[:MANAGED_BY]->(:Person {name: ManagerInput.name})
      """)
      shipments: [ShipmentInput] @cypher(statement: """
        MERGE (w)-[:SENDS]->(s:Shipment {id: ShipmentInput.id})
      """)
      docks: [DockInput]
    }

    input ManagerInput {
      name: String!
    }

    input ShipmentInput {
      id: ID!
      parcels: [ParcelInput] @cypher(statement: """
        MERGE (s)-[:HOLDS]->(:Parcel {weight: ParcelInput.weight})
      """)
    }

    input ParcelInput {
      weight: Float
    }

    input DockInput {
      doors: [DoorInput] @cypher(statement: """
        MERGE (w)-[:HAS_DOOR]->(:Door {number: DoorInput.number})
      """)
    }

    input DoorInput {
      number: Int
      notes: [NoteInput] @cypher(statement: """
        MERGE (n:Note {text: NoteInput.text}) RETURN n
      """)
    }

    input NoteInput {
      text: String
    }

    input ShelfInput {
      id: ID!
      items: [ItemInput] @cypher(statement: """
        /* never RETURN from here */
        MERGE (s)-[:STOCKS]->(:Item {sku: ItemInput.sku})
      """)
    }

    type Mutation {
      MergeCustomers(data: [CustomerInput!]!): [Customer] @cypher(statement: """
        UNWIND $data AS CustomerInput
        MERGE (c:Customer {id: CustomerInput.id})
        SET c.name = CustomerInput.name
        WITH c
        RETURN c
      """)
      ImportCustomers(data: [CustomerInput!]!): [Customer] @cypher(statement: """
        MATCH (c:Customer)
        WHERE c.id IN [customer IN $data | customer.id]
        RETURN c
      """)
      SaveCustomer(customer: CustomerInput!): Customer @cypher(statement: """
        MERGE (c:Customer {id: $customer.id})
        RETURN c
      """)
      SaveWarehouse(warehouse: WarehouseInput!): Boolean @cypher(statement: """
        MERGE (w:Warehouse {id: $warehouse.id})
      """)
      SaveShelves(data: [ShelfInput!]!): [Shelf] @cypher(statement: """
        UNWIND $data AS ShelfInput /* one node per input */
        MERGE (s:Shelf {id: ShelfInput.id})
        WITH s /* carried */
        RETURN s
      """)
      SaveBroken(customer: CustomerInput): Boolean @cypher(statement: """
        MERGE (c:Customer {name: 'open})
      """)
    }
"#};
