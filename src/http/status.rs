//! # Códigos de Estado HTTP
//!
//! Códigos de estado HTTP/1.1 que el servidor puede producir.
//! El conjunto es cerrado: cualquier respuesta que construye el servidor
//! tiene su reason phrase definido aquí.
//!
//! - **2xx**: Éxito (200, 201)
//! - **4xx**: Error del cliente (400, 404, 408, 413, 415, 431)
//! - **5xx**: Error del servidor (500, 501)

/// Representa los códigos de estado HTTP que soporta nuestro servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 201 Created - Archivo creado con `POST /files/{name}`
    Created = 201,

    /// 400 Bad Request - Request malformado o nombre de archivo inválido
    BadRequest = 400,

    /// 404 Not Found - Ruta o archivo no encontrado
    NotFound = 404,

    /// 408 Request Timeout - El cliente no terminó de enviar el request a tiempo
    RequestTimeout = 408,

    /// 413 Payload Too Large - `Content-Length` supera el límite configurado
    PayloadTooLarge = 413,

    /// 415 Unsupported Media Type - `Content-Type` no aceptado para uploads
    UnsupportedMediaType = 415,

    /// 431 Request Header Fields Too Large - Los headers superan el límite
    RequestHeaderFieldsTooLarge = 431,

    /// 500 Internal Server Error - Error interno del servidor
    InternalServerError = 500,

    /// 501 Not Implemented - Método o transfer-encoding no soportado
    NotImplemented = 501,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use crafted_http::http::StatusCode;
    /// assert_eq!(StatusCode::Created.as_u16(), 201);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use crafted_http::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::RequestTimeout => "Request Timeout",
            StatusCode::PayloadTooLarge => "Payload Too Large",
            StatusCode::UnsupportedMediaType => "Unsupported Media Type",
            StatusCode::RequestHeaderFieldsTooLarge => "Request Header Fields Too Large",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }

    /// Verifica si el código indica éxito (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.as_u16())
    }

    /// Verifica si el código indica error del cliente (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.as_u16())
    }

    /// Verifica si el código indica error del servidor (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.as_u16())
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
