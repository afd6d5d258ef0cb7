//! Bindings to the third-party scripts the page loads: the EmailJS browser
//! SDK (`emailjs`) and SweetAlert2 (`Swal`).
//!
//! Every import uses `catch`, so a script that failed to load surfaces as an
//! `Err` instead of an uncaught `ReferenceError`.
use js_sys::Promise;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = emailjs, js_name = init, catch)]
    pub fn emailjs_init(public_key: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = emailjs, js_name = send, catch)]
    pub fn emailjs_send(
        service_id: &str,
        template_id: &str,
        params: &JsValue,
    ) -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = Swal, js_name = fire, catch)]
    pub fn swal_fire(options: &JsValue) -> Result<Promise, JsValue>;
}
