use askama::Template;

#[derive(Clone)]
pub struct ToastItemView {
    pub id: String,
    pub kind: &'static str,
    pub text: String,
    pub ttl_ms: u64,
}

#[derive(Template)]
#[template(path = "toast_stack.html")]
pub struct ToastStackTemplate {
    pub toasts: Vec<ToastItemView>,
}
