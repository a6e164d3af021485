crate::using! {
    pub wallet,
}
