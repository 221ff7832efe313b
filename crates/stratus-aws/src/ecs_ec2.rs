//! Container service on an existing EC2-backed cluster
//!
//! The most composite component in the catalog: an ECS service plus its log
//! group, optional load-balancer wiring, application autoscaling with
//! metric-driven step policies, and scheduled capacity actions, all gated
//! by lookups of pre-existing infrastructure (cluster, autoscaling group,
//! load balancer).

use crate::cloudwatch::{CloudWatch, CloudWatchOptions};
use serde::{Deserialize, Serialize};
use serde_json::json;
use stratus_graph::{
    ComponentName, ExternalQuery, ResourceEngine, ResourceHandle, ResourceNode, ResourceType,
    Result, Tags,
};

const HTTPS_LISTENER_PORT: u16 = 443;
const RECORD_TTL: u32 = 5;
const SCALING_COOLDOWN_SECONDS: u32 = 60;

const DEFAULT_OFF_SCHEDULE: &str = "cron(30 7 * * ? *)";
const DEFAULT_ON_SCHEDULE: &str = "cron(0 14 * * ? *)";

/// One row of the fixed scaling catalog
#[derive(Debug, Clone, Copy)]
struct ScalingRule {
    metric_name: &'static str,
    action: &'static str,
    comparison_operator: &'static str,
    threshold: u32,
    period: u32,
    statistic: &'static str,
    scaling_adjustment: i64,
    metric_interval_lower_bound: Option<&'static str>,
    metric_interval_upper_bound: Option<&'static str>,
    disabled_by_default: bool,
}

/// CPU rules are active out of the box; memory rules ship disabled and are
/// turned on via `enable_memory_scaling`.
const SCALING_RULES: [ScalingRule; 4] = [
    ScalingRule {
        metric_name: "CPUUtilization",
        action: "down",
        comparison_operator: "LessThanThreshold",
        threshold: 40,
        period: 300,
        statistic: "Average",
        scaling_adjustment: -1,
        metric_interval_lower_bound: None,
        metric_interval_upper_bound: Some("0"),
        disabled_by_default: false,
    },
    ScalingRule {
        metric_name: "CPUUtilization",
        action: "up",
        comparison_operator: "GreaterThanOrEqualToThreshold",
        threshold: 70,
        period: 60,
        statistic: "Average",
        scaling_adjustment: 1,
        metric_interval_lower_bound: Some("1"),
        metric_interval_upper_bound: None,
        disabled_by_default: false,
    },
    ScalingRule {
        metric_name: "MemoryUtilization",
        action: "down",
        comparison_operator: "LessThanThreshold",
        threshold: 40,
        period: 300,
        statistic: "Average",
        scaling_adjustment: -1,
        metric_interval_lower_bound: None,
        metric_interval_upper_bound: Some("0"),
        disabled_by_default: true,
    },
    ScalingRule {
        metric_name: "MemoryUtilization",
        action: "up",
        comparison_operator: "GreaterThanOrEqualToThreshold",
        threshold: 70,
        period: 60,
        statistic: "Average",
        scaling_adjustment: 1,
        metric_interval_lower_bound: Some("1"),
        metric_interval_upper_bound: None,
        disabled_by_default: true,
    },
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EcsEc2HealthCheckOptions {
    pub path: Option<String>,
    pub healthy_threshold: Option<u32>,
    pub interval: Option<u32>,
    pub timeout: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcsEc2LoadBalancerOptions {
    /// Name of the pre-existing load balancer
    pub name: String,
    pub vpc_id: String,
    pub priority: u32,
    pub health_check_options: Option<EcsEc2HealthCheckOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcsEc2Route53Options {
    pub domain: String,
    pub zone_id: String,
    pub aliases: Vec<String>,
}

/// One side of the on/off capacity schedule; unset fields fall back to the
/// defaults independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EcsEc2ScheduleWindowOptions {
    pub schedule: Option<String>,
    pub min_capacity: Option<i64>,
    pub max_capacity: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EcsEc2ScheduleOptions {
    #[serde(default)]
    pub disable: bool,
    pub off_schedule: Option<EcsEc2ScheduleWindowOptions>,
    pub on_schedule: Option<EcsEc2ScheduleWindowOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcsEc2Options {
    pub name: String,
    /// Name of the pre-existing ECS cluster
    pub cluster_name: String,
    /// Name of the pre-existing autoscaling group backing the cluster
    pub auto_scaling_group_name: String,
    pub load_balancer_options: Option<EcsEc2LoadBalancerOptions>,
    pub route53_options: Option<EcsEc2Route53Options>,
    pub default_alias: String,
    pub task_definition: String,
    pub desired_count: i64,
    pub min_capacity: Option<i64>,
    pub max_capacity: Option<i64>,
    pub container_name: String,
    pub container_port: u16,
    /// Non-empty strategies suppress the explicit EC2 launch type
    #[serde(default)]
    pub capacity_provider_strategies: Vec<serde_json::Value>,
    pub turn_on_and_off_schedule: Option<EcsEc2ScheduleOptions>,
    /// Activate the memory rows of the scaling catalog
    #[serde(default)]
    pub enable_memory_scaling: bool,
    #[serde(default)]
    pub tags: Tags,
}

/// A step-scaling policy and the metric alarm that triggers it
#[derive(Debug, Clone)]
pub struct ScalingAlarm {
    pub policy: ResourceHandle,
    pub alarm: ResourceHandle,
}

/// An ECS service with autoscaling, optional load-balancer wiring, and
/// scheduled capacity
#[derive(Debug, Clone)]
pub struct EcsEc2 {
    pub service: ResourceHandle,
    pub cloudwatch: CloudWatch,
    pub target_group: Option<ResourceHandle>,
    pub listener_rule: Option<ResourceHandle>,
    pub autoscaling_attachment: Option<ResourceHandle>,
    pub app_autoscaling_target: ResourceHandle,
    pub scaling_alarms: Vec<ScalingAlarm>,
    pub scheduled_actions: Vec<ResourceHandle>,
    pub records: Vec<ResourceHandle>,
}

impl EcsEc2 {
    pub async fn create(
        engine: &dyn ResourceEngine,
        name: &str,
        options: EcsEc2Options,
    ) -> Result<Self> {
        let name = ComponentName::new(name);

        // Independent lookups resolve in any order; everything downstream
        // waits on all of them.
        let (cluster, autoscaling_group, load_balancer) = futures_util::try_join!(
            engine.lookup(ExternalQuery::EcsCluster {
                name: options.cluster_name.clone(),
            }),
            engine.lookup(ExternalQuery::AutoscalingGroup {
                name: options.auto_scaling_group_name.clone(),
            }),
            async {
                match &options.load_balancer_options {
                    Some(lb) => engine
                        .lookup(ExternalQuery::LoadBalancer {
                            name: lb.name.clone(),
                        })
                        .await
                        .map(Some),
                    None => Ok(None),
                }
            },
        )?;
        tracing::debug!(
            cluster = %options.cluster_name,
            autoscaling_group = %autoscaling_group.id,
            "resolved existing cluster infrastructure"
        );

        let mut records = Vec::new();
        if let (Some(lb), Some(route53_options)) =
            (&load_balancer, &options.route53_options)
        {
            records = Self::create_records(engine, &name, route53_options, lb).await?;
        }

        let cloudwatch = CloudWatch::create(
            engine,
            &name.child("cloudwatch"),
            CloudWatchOptions {
                name: options.name.clone(),
                retention_in_days: None,
                tags: options.tags.clone(),
            },
        )
        .await?;

        let (target_group, listener_rule, autoscaling_attachment) = match (
            &options.load_balancer_options,
            &load_balancer,
        ) {
            (Some(lb_options), Some(lb)) => {
                let target_group =
                    Self::create_target_group(engine, &name, &options, lb_options).await?;
                let listener_rule =
                    Self::create_listener_rule(engine, &name, &options, lb_options, lb, &target_group)
                        .await?;
                let attachment =
                    Self::create_autoscaling_attachment(engine, &name, &autoscaling_group, &target_group)
                        .await?;
                (Some(target_group), Some(listener_rule), Some(attachment))
            }
            _ => (None, None, None),
        };

        let mut load_balancers = Vec::new();
        if let Some(target_group) = &target_group {
            load_balancers.push(json!({
                "target_group_arn": target_group.arn()?,
                "container_name": options.container_name,
                "container_port": options.container_port,
            }));
        }

        let launch_type = if options.capacity_provider_strategies.is_empty() {
            json!("EC2")
        } else {
            serde_json::Value::Null
        };

        let mut service_node = ResourceNode::new(
            ResourceType::EcsService,
            name.child("service"),
            name.as_str(),
            json!({
                "name": options.name,
                "cluster": cluster.id,
                "task_definition": options.task_definition,
                "desired_count": options.desired_count,
                "force_new_deployment": true,
                "launch_type": launch_type,
                "propagate_tags": "SERVICE",
                "wait_for_steady_state": false,
                "health_check_grace_period_seconds": 60,
                "load_balancers": load_balancers,
                "capacity_provider_strategies": options.capacity_provider_strategies,
                "deployment_circuit_breaker": { "enable": true, "rollback": true },
                "deployment_controller": { "type": "ECS" },
                "tags": options.tags,
            }),
        )
        .with_dependency(&cloudwatch.log_group.node)
        .with_ignore_changes("desired_count");
        for handle in [&target_group, &listener_rule, &autoscaling_attachment]
            .into_iter()
            .flatten()
        {
            service_node = service_node.with_dependency(&handle.node);
        }
        let service = engine.declare(service_node).await?;

        let account_id = engine.caller_identity().await?;
        let role_arn = format!(
            "arn:aws:iam::{account_id}:role/aws-service-role/ecs.application-autoscaling.amazonaws.com/AWSServiceRoleForApplicationAutoScaling_ECSService"
        );

        let app_autoscaling_target = engine
            .declare(
                ResourceNode::new(
                    ResourceType::AppautoscalingTarget,
                    name.child("ecs-target"),
                    name.as_str(),
                    json!({
                        "min_capacity": options.min_capacity.unwrap_or(1),
                        "max_capacity": options.max_capacity.unwrap_or(2),
                        "resource_id": format!(
                            "service/{}/{}",
                            options.cluster_name, options.name
                        ),
                        "role_arn": role_arn,
                        "scalable_dimension": "ecs:service:DesiredCount",
                        "service_namespace": "ecs",
                    }),
                )
                .with_dependency(&service.node),
            )
            .await?;

        let scaling_alarms =
            Self::create_scaling_alarms(engine, &name, &options, &app_autoscaling_target).await?;

        let scheduled_actions =
            Self::create_schedule(engine, &name, &options, &app_autoscaling_target).await?;

        Ok(Self {
            service,
            cloudwatch,
            target_group,
            listener_rule,
            autoscaling_attachment,
            app_autoscaling_target,
            scaling_alarms,
            scheduled_actions,
            records,
        })
    }

    async fn create_records(
        engine: &dyn ResourceEngine,
        name: &ComponentName,
        route53_options: &EcsEc2Route53Options,
        load_balancer: &stratus_graph::ExternalHandle,
    ) -> Result<Vec<ResourceHandle>> {
        let zone = engine
            .lookup(ExternalQuery::HostedZone {
                zone_id: route53_options.zone_id.clone(),
            })
            .await?;
        let dns_name: String = load_balancer.require("dns_name")?;

        let mut records = Vec::new();
        for (idx, alias) in route53_options.aliases.iter().enumerate() {
            let record = engine
                .declare(ResourceNode::new(
                    ResourceType::Record,
                    name.child(&format!("record-{idx}")),
                    name.as_str(),
                    json!({
                        "zone_id": zone.id,
                        "name": alias,
                        "type": "CNAME",
                        "ttl": RECORD_TTL,
                        "records": [dns_name],
                    }),
                ))
                .await?;
            records.push(record);
        }
        Ok(records)
    }

    async fn create_target_group(
        engine: &dyn ResourceEngine,
        name: &ComponentName,
        options: &EcsEc2Options,
        lb_options: &EcsEc2LoadBalancerOptions,
    ) -> Result<ResourceHandle> {
        let health_check = match &lb_options.health_check_options {
            Some(hc) => json!({
                "path": hc.path,
                "interval": hc.interval,
                "timeout": hc.timeout,
                "healthy_threshold": hc.healthy_threshold,
            }),
            None => serde_json::Value::Null,
        };

        engine
            .declare(ResourceNode::new(
                ResourceType::TargetGroup,
                name.child("target-group"),
                name.as_str(),
                json!({
                    "name": options.name,
                    "vpc_id": lb_options.vpc_id,
                    "port": 80,
                    "protocol": "HTTP",
                    "health_check": health_check,
                    "tags": options.tags,
                }),
            ))
            .await
    }

    async fn create_listener_rule(
        engine: &dyn ResourceEngine,
        name: &ComponentName,
        options: &EcsEc2Options,
        lb_options: &EcsEc2LoadBalancerOptions,
        load_balancer: &stratus_graph::ExternalHandle,
        target_group: &ResourceHandle,
    ) -> Result<ResourceHandle> {
        // The rule attaches to the HTTPS listener of the existing load
        // balancer, which needs its own lookup.
        let listener = engine
            .lookup(ExternalQuery::LoadBalancerListener {
                load_balancer_arn: load_balancer.arn()?,
                port: HTTPS_LISTENER_PORT,
            })
            .await?;

        engine
            .declare(
                ResourceNode::new(
                    ResourceType::ListenerRule,
                    name.child("listener-rule"),
                    name.as_str(),
                    json!({
                        "listener_arn": listener.arn()?,
                        "priority": lb_options.priority,
                        "actions": [{
                            "type": "forward",
                            "target_group_arn": target_group.arn()?,
                        }],
                        "conditions": [{
                            "host_header": { "values": [options.default_alias] },
                        }],
                        "tags": options.tags,
                    }),
                )
                .with_dependency(&target_group.node),
            )
            .await
    }

    async fn create_autoscaling_attachment(
        engine: &dyn ResourceEngine,
        name: &ComponentName,
        autoscaling_group: &stratus_graph::ExternalHandle,
        target_group: &ResourceHandle,
    ) -> Result<ResourceHandle> {
        tracing::debug!(autoscaling_group = %autoscaling_group.id, "attaching target group");

        engine
            .declare(
                ResourceNode::new(
                    ResourceType::AutoscalingAttachment,
                    name.child("asg-attachment"),
                    name.as_str(),
                    json!({
                        "autoscaling_group_name": autoscaling_group.id,
                        "lb_target_group_arn": target_group.arn()?,
                    }),
                )
                .with_dependency(&target_group.node),
            )
            .await
    }

    async fn create_scaling_alarms(
        engine: &dyn ResourceEngine,
        name: &ComponentName,
        options: &EcsEc2Options,
        target: &ResourceHandle,
    ) -> Result<Vec<ScalingAlarm>> {
        let resource_id: String = target.require("resource_id")?;
        let scalable_dimension: String = target.require("scalable_dimension")?;
        let service_namespace: String = target.require("service_namespace")?;

        let mut alarms = Vec::new();
        for (idx, rule) in SCALING_RULES.iter().enumerate() {
            if rule.disabled_by_default && !options.enable_memory_scaling {
                continue;
            }

            let policy_name = format!("{}-{}-{}", options.name, rule.metric_name, rule.action);
            let policy = engine
                .declare(
                    ResourceNode::new(
                        ResourceType::AppautoscalingPolicy,
                        name.child(&format!("autoscaling-policy-{idx}")),
                        name.as_str(),
                        json!({
                            "policy_type": "StepScaling",
                            "name": policy_name,
                            "resource_id": resource_id,
                            "scalable_dimension": scalable_dimension,
                            "service_namespace": service_namespace,
                            "step_scaling_policy_configuration": {
                                "adjustment_type": "ChangeInCapacity",
                                "cooldown": SCALING_COOLDOWN_SECONDS,
                                "metric_aggregation_type": "Average",
                                "step_adjustments": [{
                                    "scaling_adjustment": rule.scaling_adjustment,
                                    "metric_interval_lower_bound": rule.metric_interval_lower_bound,
                                    "metric_interval_upper_bound": rule.metric_interval_upper_bound,
                                }],
                            },
                        }),
                    )
                    .with_dependency(&target.node),
                )
                .await?;

            let alarm = engine
                .declare(
                    ResourceNode::new(
                        ResourceType::MetricAlarm,
                        name.child(&format!("metric-alarm-{idx}")),
                        name.as_str(),
                        json!({
                            "alarm_description": format!(
                                "Scale {} alarm for {} due to {}",
                                rule.action, options.name, rule.metric_name
                            ),
                            "namespace": "AWS/ECS",
                            "name": policy_name,
                            "alarm_actions": [policy.arn()?],
                            "comparison_operator": rule.comparison_operator,
                            "threshold": rule.threshold,
                            "evaluation_periods": 1,
                            "metric_name": rule.metric_name,
                            "period": rule.period,
                            "statistic": rule.statistic,
                            "datapoints_to_alarm": 1,
                            "dimensions": {
                                "ServiceName": options.name,
                                "ClusterName": options.cluster_name,
                            },
                            "tags": options.tags,
                        }),
                    )
                    .with_dependency(&policy.node),
                )
                .await?;

            alarms.push(ScalingAlarm { policy, alarm });
        }
        Ok(alarms)
    }

    /// Scale-to-zero outside business hours unless the schedule is
    /// disabled; either cron or the capacity bounds can be overridden
    /// independently.
    async fn create_schedule(
        engine: &dyn ResourceEngine,
        name: &ComponentName,
        options: &EcsEc2Options,
        target: &ResourceHandle,
    ) -> Result<Vec<ResourceHandle>> {
        let schedule_options = options.turn_on_and_off_schedule.clone().unwrap_or_default();
        if schedule_options.disable {
            return Ok(Vec::new());
        }

        let on = Self::merge_window(
            schedule_options.on_schedule.as_ref(),
            DEFAULT_ON_SCHEDULE,
            1,
            2,
        );
        let off = Self::merge_window(
            schedule_options.off_schedule.as_ref(),
            DEFAULT_OFF_SCHEDULE,
            0,
            0,
        );

        let mut actions = Vec::new();
        for (suffix, window) in [("on", on), ("off", off)] {
            let (schedule, min_capacity, max_capacity) = window;
            let action = engine
                .declare(
                    ResourceNode::new(
                        ResourceType::ScheduledAction,
                        name.child(&format!("scheduled-action-{suffix}")),
                        name.as_str(),
                        json!({
                            "name": format!("{}-{suffix}-schedule", options.name),
                            "resource_id": target.require::<String>("resource_id")?,
                            "scalable_dimension": target.require::<String>("scalable_dimension")?,
                            "service_namespace": target.require::<String>("service_namespace")?,
                            "schedule": schedule,
                            "scalable_target_action": {
                                "min_capacity": min_capacity,
                                "max_capacity": max_capacity,
                            },
                        }),
                    )
                    .with_dependency(&target.node),
                )
                .await?;
            actions.push(action);
        }
        Ok(actions)
    }

    fn merge_window(
        window: Option<&EcsEc2ScheduleWindowOptions>,
        default_schedule: &str,
        default_min: i64,
        default_max: i64,
    ) -> (String, i64, i64) {
        let schedule = window
            .and_then(|w| w.schedule.clone())
            .unwrap_or_else(|| default_schedule.to_string());
        let min = window.and_then(|w| w.min_capacity).unwrap_or(default_min);
        let max = window.and_then(|w| w.max_capacity).unwrap_or(default_max);
        (schedule, min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_enables_only_cpu_rules_by_default() {
        let enabled: Vec<_> = SCALING_RULES
            .iter()
            .filter(|r| !r.disabled_by_default)
            .collect();
        assert_eq!(enabled.len(), 2);
        assert!(enabled.iter().all(|r| r.metric_name == "CPUUtilization"));
    }

    #[test]
    fn catalog_pairs_scale_direction_with_comparison() {
        for rule in &SCALING_RULES {
            match rule.action {
                "up" => {
                    assert_eq!(rule.comparison_operator, "GreaterThanOrEqualToThreshold");
                    assert_eq!(rule.scaling_adjustment, 1);
                    assert_eq!(rule.threshold, 70);
                    assert_eq!(rule.period, 60);
                }
                "down" => {
                    assert_eq!(rule.comparison_operator, "LessThanThreshold");
                    assert_eq!(rule.scaling_adjustment, -1);
                    assert_eq!(rule.threshold, 40);
                    assert_eq!(rule.period, 300);
                }
                other => panic!("unexpected action {other}"),
            }
        }
    }

    #[test]
    fn schedule_window_merges_per_field() {
        let window = EcsEc2ScheduleWindowOptions {
            schedule: None,
            min_capacity: Some(3),
            max_capacity: None,
        };
        let (schedule, min, max) =
            EcsEc2::merge_window(Some(&window), DEFAULT_ON_SCHEDULE, 1, 2);
        assert_eq!(schedule, DEFAULT_ON_SCHEDULE);
        assert_eq!(min, 3);
        assert_eq!(max, 2);

        let (schedule, min, max) = EcsEc2::merge_window(None, DEFAULT_OFF_SCHEDULE, 0, 0);
        assert_eq!(schedule, "cron(30 7 * * ? *)");
        assert_eq!(min, 0);
        assert_eq!(max, 0);
    }
}
