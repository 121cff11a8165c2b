use cdd_paramcheck::{
    ApiDocument, AppError, ParamValidator, RawRequest, ValidationOptions, ViolationKind,
};
use pretty_assertions::assert_eq;

const PETSTORE: &str = r#"
openapi: 3.1.0
info:
  title: Cookie API
  version: 1.0.0
servers:
  - url: https://api.example.com/v1
paths:
  /pets:
    parameters:
      - $ref: '#/components/parameters/Session'
    get:
      operationId: listPets
      parameters:
        - name: ids
          in: cookie
          explode: false
          schema:
            type: array
            items:
              type: integer
        - name: debug
          in: cookie
          schema:
            type: boolean
        - name: limit
          in: query
          schema:
            type: integer
        - name: theme
          in: cookie
          schema:
            $ref: '#/components/schemas/Theme'
    post:
      operationId: createPet
      parameters:
        - name: prefs
          in: cookie
          explode: false
          schema:
            type: object
            properties:
              role:
                type: string
              level:
                type: integer
            required: [role, level]
      responses:
        201:
          description: created
  /pets/{petId}:
    get:
      parameters:
        - name: petId
          in: path
          required: true
          schema:
            type: integer
        - name: weight
          in: cookie
          schema:
            type: [number, "null"]
  /pets/mine:
    get:
      parameters:
        - name: owner
          in: cookie
          schema:
            type: string
components:
  schemas:
    Theme:
      type: string
      enum: [red, green, blue]
  parameters:
    Session:
      name: session
      in: cookie
      schema:
        type: integer
"#;

fn validator() -> ParamValidator {
    let doc = ApiDocument::from_yaml_str(PETSTORE).expect("document parses");
    ParamValidator::new(&doc).expect("document compiles")
}

#[test]
fn test_array_cookie_with_bad_item() {
    let v = validator();
    let req = RawRequest::new("GET", "/pets").with_cookie("ids", "1,two,3");
    let (passed, violations) = v.validate_cookie_params(&req);

    assert!(!passed);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::ArrayItemMismatch);
    assert_eq!(violations[0].value, "two");
    assert_eq!(
        violations[0].message,
        "Cookie array parameter 'ids' is not a valid number"
    );
}

#[test]
fn test_valid_cookies_pass() {
    let v = validator();
    let req = RawRequest::new("GET", "/pets?limit=10")
        .with_cookie_header("ids=1,2,3; debug=TRUE; theme= red ; session=42; unrelated=xyz");
    let (passed, violations) = v.validate_cookie_params(&req);
    assert!(passed, "unexpected violations: {:?}", violations);
    assert!(violations.is_empty());
}

#[test]
fn test_no_cookies_pass() {
    let v = validator();
    let (passed, violations) = v.validate_cookie_params(&RawRequest::new("GET", "/pets"));
    assert!(passed);
    assert!(violations.is_empty());
}

#[test]
fn test_all_violations_collected() {
    let v = validator();
    let req = RawRequest::new("GET", "/pets")
        .with_cookie("ids", "x,2,y")
        .with_cookie("debug", "Maybe")
        .with_cookie("theme", "Red")
        .with_cookie("session", "abc");
    let (passed, violations) = v.validate_cookie_params(&req);

    assert!(!passed);
    let got: Vec<(ViolationKind, &str)> = violations
        .iter()
        .map(|v| (v.kind, v.value.as_str()))
        .collect();
    assert_eq!(
        got,
        vec![
            (ViolationKind::NotNumber, "abc"),
            (ViolationKind::ArrayItemMismatch, "x"),
            (ViolationKind::ArrayItemMismatch, "y"),
            (ViolationKind::NotBoolean, "maybe"),
            (ViolationKind::NotInEnum, "Red"),
        ]
    );
    assert_eq!(
        violations[4].how_to_fix,
        "Instead of 'Red', use one of the allowed values: 'red, green, blue'"
    );
}

#[test]
fn test_object_cookie() {
    let v = validator();

    let ok = RawRequest::new("POST", "/pets").with_cookie("prefs", "role,admin,level,3");
    assert_eq!(v.validate_cookie_params(&ok), (true, vec![]));

    let bad = RawRequest::new("POST", "/pets").with_cookie("prefs", "role,admin,level");
    let (passed, violations) = v.validate_cookie_params(&bad);
    assert!(!passed);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::ObjectSchemaMismatch);
    assert!(!violations[0].schema_errors.is_empty());
}

#[test]
fn test_server_base_path_and_templates() {
    let v = validator();

    let req = RawRequest::new("GET", "/v1/pets/12").with_cookie("weight", "heavy");
    let (passed, violations) = v.validate_cookie_params(&req);
    assert!(!passed);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::NotNumber);

    // The literal template wins over `/pets/{petId}`.
    let req = RawRequest::new("GET", "/pets/mine/").with_cookie("weight", "heavy");
    assert_eq!(v.validate_cookie_params(&req), (true, vec![]));
}

#[test]
fn test_resolution_failures_short_circuit() {
    let v = validator();

    let req = RawRequest::new("GET", "/owners").with_cookie("ids", "nope");
    let (passed, violations) = v.validate_cookie_params(&req);
    assert!(!passed);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::PathNotFound);

    let req = RawRequest::new("DELETE", "/pets").with_cookie("ids", "nope");
    let (passed, violations) = v.validate_cookie_params(&req);
    assert!(!passed);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::OperationNotFound);
}

#[test]
fn test_base_path_stripping_can_be_disabled() {
    let doc = ApiDocument::from_yaml_str(PETSTORE).unwrap();
    let options = ValidationOptions::default().with_server_base_paths(false);
    let v = ParamValidator::with_options(&doc, options).unwrap();

    let (passed, violations) = v.validate_cookie_params(&RawRequest::new("GET", "/v1/pets"));
    assert!(!passed);
    assert_eq!(violations[0].kind, ViolationKind::PathNotFound);
}

#[test]
fn test_dangling_parameter_ref_is_an_error() {
    let yaml = r#"
openapi: 3.0.3
info: {title: Broken, version: "1"}
paths:
  /x:
    get:
      parameters:
        - $ref: '#/components/parameters/Missing'
"#;
    let doc = ApiDocument::from_yaml_str(yaml).unwrap();
    let err = ParamValidator::new(&doc).err().expect("build must fail");
    assert!(matches!(err, AppError::Reference(_)));
}

#[test]
fn test_oas30_object_schema_uses_draft4_keywords() {
    let yaml = r#"
openapi: 3.0.3
info: {title: Legacy, version: "1"}
paths:
  /prefs:
    get:
      parameters:
        - name: prefs
          in: cookie
          explode: false
          schema:
            type: object
            properties:
              level:
                type: integer
                minimum: 0
                exclusiveMinimum: true
"#;
    let doc = ApiDocument::from_yaml_str(yaml).unwrap();
    let v = ParamValidator::new(&doc).expect("OAS 3.0 schema compiles");

    let ok = RawRequest::new("GET", "/prefs").with_cookie("prefs", "level,5");
    assert_eq!(v.validate_cookie_params(&ok), (true, vec![]));

    let bad = RawRequest::new("GET", "/prefs").with_cookie("prefs", "level,0");
    let (passed, violations) = v.validate_cookie_params(&bad);
    assert!(!passed);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::ObjectSchemaMismatch);
    assert_eq!(violations[0].schema_errors[0].instance_path, "/level");
}

#[test]
fn test_invalid_object_schema_fails_build() {
    let yaml = r#"
openapi: 3.1.0
info: {title: Broken, version: "1"}
paths:
  /prefs:
    get:
      parameters:
        - name: prefs
          in: cookie
          explode: false
          schema:
            type: object
            properties:
              level: {type: integer, exclusiveMinimum: true}
"#;
    let doc = ApiDocument::from_yaml_str(yaml).unwrap();
    let err = ParamValidator::new(&doc).err().expect("build must fail");
    assert!(matches!(err, AppError::Schema(_)));
    let message = err.to_string();
    assert!(message.contains("GET /prefs"), "{}", message);
    assert!(message.contains("Cookie parameter 'prefs'"), "{}", message);
}

#[test]
fn test_violations_serialize() {
    let v = validator();
    let req = RawRequest::new("GET", "/pets").with_cookie("debug", "nah");
    let (_, violations) = v.validate_cookie_params(&req);
    let json = serde_json::to_value(&violations).unwrap();
    assert_eq!(json[0]["kind"], "NotBoolean");
    assert_eq!(json[0]["validation_type"], "parameter");
    assert_eq!(json[0]["validation_sub_type"], "cookie");
    assert_eq!(json[0]["parameter"]["name"], "debug");
    assert_eq!(json[0]["parameter"]["in"], "cookie");
}

#[cfg(feature = "actix")]
#[test]
fn test_actix_request() {
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    let v = validator();
    let req = TestRequest::get()
        .uri("/pets")
        .cookie(Cookie::new("ids", "1,two,3"))
        .to_http_request();
    let (passed, violations) = v.validate_cookie_params(&req);
    assert!(!passed);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].value, "two");
}
