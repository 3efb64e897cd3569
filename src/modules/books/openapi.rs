use serde_json::{json, Value};

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "$ref": "#/components/schemas/ErrorResponse"
                }
            }
        }
    })
}

fn book_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "$ref": "#/components/schemas/Book"
                }
            }
        }
    })
}

fn json_body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": {
                    "$ref": format!("#/components/schemas/{}", schema)
                }
            }
        }
    })
}

fn id_parameter() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": "Book identifier",
        "schema": {
            "type": "string"
        }
    })
}

/// OpenAPI fragment for the books routes, relative to `/api`
pub(super) fn spec() -> Value {
    json!({
        "paths": {
            "/books": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "List of books",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": {
                                            "$ref": "#/components/schemas/Book"
                                        }
                                    }
                                }
                            }
                        },
                        "500": error_response("Storage failure")
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": json_body("CreateBook"),
                    "responses": {
                        "200": book_response("Created book with its assigned id"),
                        "400": error_response("Malformed or invalid payload"),
                        "500": error_response("Storage failure")
                    }
                }
            },
            "/book/{id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": book_response("The book"),
                        "404": error_response("Book not found"),
                        "500": error_response("Storage failure")
                    }
                },
                "put": {
                    "summary": "Update a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "requestBody": json_body("UpdateBook"),
                    "responses": {
                        "200": book_response("The updated book"),
                        "400": error_response("Malformed or invalid payload"),
                        "404": error_response("Book not found"),
                        "500": error_response("Storage failure")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": {
                            "description": "Deleted, or did not exist"
                        },
                        "500": error_response("Storage failure")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Author": {
                    "type": "object",
                    "properties": {
                        "firstname": {
                            "type": "string"
                        },
                        "lastname": {
                            "type": "string"
                        }
                    },
                    "required": ["firstname", "lastname"]
                },
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "string",
                            "description": "Server-assigned identifier"
                        },
                        "isbn": {
                            "type": "string"
                        },
                        "title": {
                            "type": "string"
                        },
                        "author": {
                            "$ref": "#/components/schemas/Author"
                        }
                    },
                    "required": ["id", "isbn", "title", "author"]
                },
                "CreateBook": {
                    "type": "object",
                    "properties": {
                        "isbn": {
                            "type": "string"
                        },
                        "title": {
                            "type": "string"
                        },
                        "author": {
                            "$ref": "#/components/schemas/Author"
                        }
                    },
                    "required": ["title", "author"]
                },
                "UpdateBook": {
                    "type": "object",
                    "properties": {
                        "isbn": {
                            "type": "string"
                        },
                        "title": {
                            "type": "string"
                        },
                        "author": {
                            "$ref": "#/components/schemas/Author"
                        }
                    }
                }
            }
        }
    })
}
