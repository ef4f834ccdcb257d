use dotenv::dotenv;
use hue_entertain::prelude::*;
use std::time::Duration;

#[tokio::main]
async fn main() {
    dotenv().ok();
    pretty_env_logger::init();

    let mut hue = HueEntertainment::new("hue_entertain_demo#example_machine").unwrap();
    hue.discover().await.expect("bridge discovery failed");

    let bridge_name = hue.list_bridges().first().expect("no bridges found").to_string();
    let config_name = hue
        .list_configurations(&bridge_name)
        .await
        .expect("failed to list entertainment configurations")
        .into_iter()
        .next()
        .expect("no entertainment configurations on this bridge");

    hue.select(&bridge_name, &config_name)
        .await
        .expect("failed to select entertainment configuration");
    hue.start(&bridge_name).await.expect("failed to start streaming");

    let mut tick: u8 = 0;
    loop {
        let red = ChannelColor {
            channel_id: 0,
            color: LightColor::Rgb8(tick, 0, 255 - tick),
        };
        hue.set_colors(&bridge_name, &[red]).await.ok();
        tick = tick.wrapping_add(4);
        tokio::time::sleep(Duration::from_millis(40)).await;
    }
}
