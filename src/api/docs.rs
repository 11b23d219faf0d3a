//! Static OpenAPI description of the gateway surface
//!
//! Built once from the route table and served at /api-docs/openapi.json.
//! The document is plain data; it is not derived from runtime types.

use lazy_static::lazy_static;
use serde_json::{json, Value};

lazy_static! {
    static ref OPENAPI: Value = build_document();
}

/// The OpenAPI document served for interactive exploration
pub fn openapi_document() -> &'static Value {
    &OPENAPI
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ApiError" }
            }
        }
    })
}

fn build_document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Amazon S3 gateway",
            "description": "Versioned REST facade over Amazon S3 bucket and object operations",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/v1/aws/s3/list-buckets": {
                "get": {
                    "summary": "List all buckets visible to the configured credentials",
                    "operationId": "listBuckets",
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/BucketDescriptor" }
                                    }
                                }
                            }
                        },
                        "500": error_response("Internal Server Error"),
                    }
                }
            },
            "/v1/aws/s3/bucket-content": {
                "get": {
                    "summary": "List every object in a bucket",
                    "operationId": "listBucketContent",
                    "parameters": [{
                        "name": "bucket-name",
                        "in": "query",
                        "required": true,
                        "schema": { "type": "string" }
                    }],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/BucketObjectDescriptor" }
                                    }
                                }
                            }
                        },
                        "400": error_response("Bad Request"),
                        "404": error_response("Not Found"),
                        "500": error_response("Internal Server Error"),
                    }
                }
            },
            "/v1/aws/s3/bucket": {
                "post": {
                    "summary": "Create a bucket. Names must be 3-63 characters, lowercase, without spaces, DNS-compatible, and globally unique",
                    "operationId": "createBucket",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/BucketDescriptor" }
                            }
                        }
                    },
                    "responses": {
                        "201": {
                            "description": "Created",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BucketDescriptor" }
                                }
                            }
                        },
                        "400": error_response("Bad Request"),
                        "409": error_response("Conflict"),
                        "500": error_response("Internal Server Error"),
                    }
                }
            },
            "/v1/aws/s3/bucket/{bucket-name}": {
                "delete": {
                    "summary": "Delete an empty bucket",
                    "operationId": "deleteBucket",
                    "parameters": [{
                        "name": "bucket-name",
                        "in": "path",
                        "required": true,
                        "schema": { "type": "string" }
                    }],
                    "responses": {
                        "200": { "description": "OK" },
                        "400": error_response("Bad Request"),
                        "404": error_response("Not Found"),
                        "409": error_response("Conflict"),
                        "500": error_response("Internal Server Error"),
                    }
                },
                "put": {
                    "summary": "Upload a local file from the gateway host into a bucket",
                    "operationId": "putObject",
                    "parameters": [{
                        "name": "bucket-name",
                        "in": "path",
                        "required": true,
                        "schema": { "type": "string" }
                    }],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/UploadRequest" }
                            }
                        }
                    },
                    "responses": {
                        "200": { "description": "OK" },
                        "400": error_response("Bad Request"),
                        "404": error_response("Not Found"),
                        "500": error_response("Internal Server Error"),
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "BucketDescriptor": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {
                        "name": { "type": "string" },
                        "creationDate": { "type": "string", "format": "date-time" }
                    }
                },
                "BucketObjectDescriptor": {
                    "type": "object",
                    "required": ["key", "size"],
                    "properties": {
                        "key": { "type": "string" },
                        "size": { "type": "integer", "minimum": 0 },
                        "lastModified": { "type": "string", "format": "date-time" },
                        "storageClass": { "type": "string" }
                    }
                },
                "UploadRequest": {
                    "type": "object",
                    "required": ["fileName", "file"],
                    "properties": {
                        "fileName": { "type": "string" },
                        "file": {
                            "type": "string",
                            "description": "Path to a file on the gateway host's filesystem"
                        }
                    }
                },
                "ApiError": {
                    "type": "object",
                    "required": ["timestamp", "status", "error", "message", "path"],
                    "properties": {
                        "timestamp": { "type": "string", "format": "date-time" },
                        "status": { "type": "integer" },
                        "error": { "type": "string" },
                        "message": { "type": "string" },
                        "path": { "type": "string" }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_describes_the_five_operations() {
        let doc = openapi_document();
        let paths = doc["paths"].as_object().unwrap();

        assert!(paths["/v1/aws/s3/list-buckets"].get("get").is_some());
        assert!(paths["/v1/aws/s3/bucket-content"].get("get").is_some());
        assert!(paths["/v1/aws/s3/bucket"].get("post").is_some());
        assert!(paths["/v1/aws/s3/bucket/{bucket-name}"].get("delete").is_some());
        assert!(paths["/v1/aws/s3/bucket/{bucket-name}"].get("put").is_some());
    }

    #[test]
    fn document_declares_the_error_schema() {
        let doc = openapi_document();
        let schema = &doc["components"]["schemas"]["ApiError"];
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            required,
            ["timestamp", "status", "error", "message", "path"]
        );
    }
}
