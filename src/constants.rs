pub const OK_RESPONSE: &str = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n";
pub const CREATED: &str = "HTTP/1.1 201 Created\r\nContent-Type: application/json\r\n\r\n";
pub const NO_CONTENT: &str = "HTTP/1.1 204 No Content\r\n\r\n";
pub const BAD_REQUEST: &str = "HTTP/1.1 400 Bad Request\r\nContent-Type: application/json\r\n\r\n";
pub const UNAUTHORIZED: &str = "HTTP/1.1 401 Unauthorized\r\nContent-Type: application/json\r\n\r\n";
pub const NOT_FOUND: &str = "HTTP/1.1 404 NOT FOUND\r\nContent-Type: application/json\r\n\r\n";
pub const CONFLICT: &str = "HTTP/1.1 409 Conflict\r\nContent-Type: application/json\r\n\r\n";
pub const UNPROCESSABLE_ENTITY: &str =
    "HTTP/1.1 422 Unprocessable Entity\r\nContent-Type: application/json\r\n\r\n";
pub const TOO_MANY_REQUESTS: &str =
    "HTTP/1.1 429 Too Many Requests\r\nContent-Type: application/json\r\n\r\n";
pub const INTERNAL_ERROR: &str =
    "HTTP/1.1 500 INTERNAL ERROR\r\nContent-Type: application/json\r\n\r\n";

pub const MILLIS_PER_DAY: i64 = 86_400_000;
