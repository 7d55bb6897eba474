fn main() {
    multiversx_sc_meta_lib::cli_main::<dex_mock::AbiProvider>();
}
